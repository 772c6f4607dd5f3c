use rollcall_core::{absolutize, collapse_whitespace, infer_party, MemberRecord, ScrapeTarget};
use scraper::{ElementRef, Selector};

use crate::error::ScrapeError;
use crate::locator::compile;

/// Reads one [`MemberRecord`] out of a member card.
///
/// Every card yields a record; fields the card lacks stay empty.
#[derive(Debug)]
pub struct FieldExtractor {
    target: ScrapeTarget,
    name: Vec<Selector>,
    party: Vec<Selector>,
    details: Vec<Selector>,
    image: Vec<Selector>,
    link: Vec<Selector>,
}

impl FieldExtractor {
    pub fn new(target: &ScrapeTarget) -> Result<Self, ScrapeError> {
        let selectors = &target.selectors;
        Ok(Self {
            target: target.clone(),
            name: compile(&selectors.name)?,
            party: compile(&selectors.party)?,
            details: compile(&selectors.details)?,
            image: compile(&selectors.image)?,
            link: compile(&selectors.link)?,
        })
    }

    pub fn extract(&self, card: ElementRef<'_>) -> MemberRecord {
        let mut record = MemberRecord::new(&self.target);

        record.name = collapse_whitespace(&try_read_text(card, &self.name, " "));
        record.otherinfo = try_read_text(card, &self.details, "\n");
        record.party = collapse_whitespace(&try_read_text(card, &self.party, " "));
        if record.party.is_empty() {
            record.party = infer_party(&record.otherinfo);
        }
        if record.party.is_empty() {
            record.party = infer_party(&element_text(card, " "));
        }

        let src = try_read_attr(card, &self.image, &self.target.selectors.image_attrs);
        record.profile = absolutize(&src, &self.target.base_url);

        let href = try_read_attr(card, &self.link, &["href".to_string()]);
        record.url = absolutize(&href, &self.target.base_url);

        record
    }
}

/// Text of the first candidate element with any text; `""` when none match.
pub fn try_read_text(card: ElementRef<'_>, candidates: &[Selector], separator: &str) -> String {
    candidates
        .iter()
        .flat_map(|selector| card.select(selector).next())
        .map(|el| element_text(el, separator))
        .find(|text| !text.is_empty())
        .unwrap_or_default()
}

/// First non-empty attribute from `attrs` on the first candidate element.
pub fn try_read_attr(card: ElementRef<'_>, candidates: &[Selector], attrs: &[String]) -> String {
    candidates
        .iter()
        .flat_map(|selector| card.select(selector).next())
        .find_map(|el| {
            attrs
                .iter()
                .filter_map(|attr| el.value().attr(attr))
                .map(str::trim)
                .find(|value| !value.is_empty())
        })
        .unwrap_or_default()
        .to_string()
}

/// Non-blank text nodes, each trimmed, joined with `separator`.
fn element_text(el: ElementRef<'_>, separator: &str) -> String {
    el.text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    fn extractor() -> FieldExtractor {
        FieldExtractor::new(&ScrapeTarget::builtin("akleg-senate").unwrap()).unwrap()
    }

    fn first_card(html: &Html) -> ElementRef<'_> {
        html.select(&Selector::parse("div.member").unwrap())
            .next()
            .unwrap()
    }

    #[test]
    fn reads_all_fields_from_full_card() {
        let html = Html::parse_document(
            r#"<div class="member">
                 <a href="/senate/jane-doe"><img src="/images/doe.jpg"></a>
                 <span class="member-name">
                    Jane   Doe
                 </span>
                 <span class="member-party">Republican</span>
               </div>"#,
        );
        let record = extractor().extract(first_card(&html));

        assert_eq!(record.name, "Jane Doe");
        assert_eq!(record.title, "Senator");
        assert_eq!(record.party, "Republican");
        assert_eq!(record.profile, "https://akleg.gov/images/doe.jpg");
        assert_eq!(record.dob, "");
        assert_eq!(record.kind, "Senator");
        assert_eq!(record.country, "USA");
        assert_eq!(record.url, "https://akleg.gov/senate/jane-doe");
        assert_eq!(record.otherinfo, "");
    }

    #[test]
    fn missing_image_leaves_profile_empty() {
        let html = Html::parse_document(
            r#"<div class="member">
                 <a href="https://akleg.gov/senate/smith">Profile</a>
                 <span class="member-name">John Smith</span>
               </div>"#,
        );
        let record = extractor().extract(first_card(&html));
        assert_eq!(record.profile, "");
        assert_eq!(record.url, "https://akleg.gov/senate/smith");
    }

    #[test]
    fn party_inferred_from_details_which_are_kept() {
        let html = Html::parse_document(
            r#"<div class="member">
                 <span class="member-name">Ann Lee</span>
                 <div class="member-details">
                   District M
                   <br>Democrat, Anchorage
                 </div>
               </div>"#,
        );
        let record = extractor().extract(first_card(&html));
        assert_eq!(record.party, "Democrat");
        assert_eq!(record.otherinfo, "District M\nDemocrat, Anchorage");
    }

    #[test]
    fn party_inferred_from_card_text_without_details() {
        let html = Html::parse_document(
            r#"<div class="member"><strong>Bo Tran</strong> (Republican)</div>"#,
        );
        let record = extractor().extract(first_card(&html));
        assert_eq!(record.name, "Bo Tran");
        assert_eq!(record.party, "Republican");
    }

    #[test]
    fn no_party_token_leaves_party_empty() {
        let html = Html::parse_document(
            r#"<div class="member">
                 <span class="member-name">Cy Moss</span>
                 <div class="member-details">District B, Fairbanks</div>
               </div>"#,
        );
        let record = extractor().extract(first_card(&html));
        assert_eq!(record.party, "");
    }

    #[test]
    fn lazy_image_attribute_is_used() {
        let html = Html::parse_document(
            r#"<div class="member">
                 <img src="" data-src="//cdn.akleg.gov/p/1.png">
                 <span class="member-name">Di Park</span>
               </div>"#,
        );
        let record = extractor().extract(first_card(&html));
        assert_eq!(record.profile, "https://cdn.akleg.gov/p/1.png");
    }

    #[test]
    fn card_without_name_or_link_still_yields_record() {
        let html = Html::parse_document(
            r#"<div class="member">
                 <img src="/p.jpg">
                 <span class="member-party">Democrat</span>
               </div>"#,
        );
        let record = extractor().extract(first_card(&html));

        assert_eq!(record.name, "");
        assert_eq!(record.url, "");
        assert_eq!(record.party, "Democrat");
        assert_eq!(record.profile, "https://akleg.gov/p.jpg");
        assert_eq!(record.title, "Senator");
    }

    #[test]
    fn empty_card_yields_record_with_only_target_labels() {
        let html = Html::parse_document(r#"<div class="member"></div>"#);
        let record = extractor().extract(first_card(&html));

        let expected = MemberRecord::new(&ScrapeTarget::builtin("akleg-senate").unwrap());
        assert_eq!(record, expected);
    }

    #[test]
    fn helpers_return_empty_on_absence() {
        let html = Html::parse_document(r#"<div class="member"><p>nothing</p></div>"#);
        let card = first_card(&html);
        let missing = vec![Selector::parse(".nope").unwrap()];

        assert_eq!(try_read_text(card, &missing, " "), "");
        assert_eq!(try_read_text(card, &[], " "), "");
        assert_eq!(try_read_attr(card, &missing, &["src".to_string()]), "");

        let para = vec![Selector::parse("p").unwrap()];
        assert_eq!(try_read_attr(card, &para, &["href".to_string()]), "");
    }
}
