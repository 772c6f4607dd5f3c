use serde::{Deserialize, Serialize};

pub mod normalize;
pub mod target;

pub use normalize::{absolutize, collapse_whitespace, infer_party};
pub use target::{ScrapeTarget, TargetSelectors, BUILTIN_TARGETS};

pub const PROJECT_NAME: &str = "rollcall";
pub const PROJECT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// One legislator entry as written to the roster file.
///
/// Field order is the on-disk key order. Unknown values are empty strings,
/// never missing keys.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberRecord {
    pub name: String,
    pub title: String,
    pub party: String,
    pub profile: String,
    pub dob: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub country: String,
    pub url: String,
    pub otherinfo: String,
}

impl MemberRecord {
    /// Empty record carrying the target's constant labels.
    pub fn new(target: &ScrapeTarget) -> Self {
        Self {
            title: target.role.clone(),
            kind: target.role.clone(),
            country: target.country.clone(),
            ..Self::default()
        }
    }
}

/// Members in page order. Duplicates are kept.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RosterDocument {
    members: Vec<MemberRecord>,
}

impl RosterDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, member: MemberRecord) {
        self.members.push(member);
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MemberRecord> {
        self.members.iter()
    }

    pub fn into_members(self) -> Vec<MemberRecord> {
        self.members
    }
}

impl From<Vec<MemberRecord>> for RosterDocument {
    fn from(members: Vec<MemberRecord>) -> Self {
        Self { members }
    }
}

impl<'a> IntoIterator for &'a RosterDocument {
    type Item = &'a MemberRecord;
    type IntoIter = std::slice::Iter<'a, MemberRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.iter()
    }
}
