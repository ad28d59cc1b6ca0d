//! HTML parser for CoinAfrique listing and detail pages.

use crate::coinafrique::models::{ListingLink, RawItem};
use crate::coinafrique::selectors::SelectorMap;
use scraper::{ElementRef, Html};
use tracing::{debug, trace};

/// Parser for CoinAfrique HTML pages.
#[derive(Debug, Clone)]
pub struct Parser {
    origin: String,
    selectors: SelectorMap,
}

impl Parser {
    /// Creates a parser with the default selectors.
    pub fn new(origin: impl Into<String>) -> Self {
        Self::with_selectors(origin, SelectorMap::default())
    }

    /// Creates a parser with a custom selector map.
    pub fn with_selectors(origin: impl Into<String>, selectors: SelectorMap) -> Self {
        let origin = origin.into().trim_end_matches('/').to_string();
        Self { origin, selectors }
    }

    /// Returns the site origin detail links are resolved against.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Parses a listing page. Use [`ListingPage::links`] to walk its ad cards.
    pub fn parse_listing<'p>(&'p self, html: &str) -> ListingPage<'p> {
        ListingPage { parser: self, document: Html::parse_document(html) }
    }

    /// Parses a detail page into a raw item.
    ///
    /// Each field is looked up independently; a missing node only leaves that
    /// field empty. An item without a name is still returned.
    pub fn parse_detail(&self, html: &str) -> RawItem {
        let document = Html::parse_document(html);

        let name = self.first_text(&document, &self.selectors.title);
        let price_text = self.first_text(&document, &self.selectors.price);
        let address_text = document
            .select(&self.selectors.address)
            .find_map(|e| e.value().attr(&self.selectors.address_attr))
            .map(|a| a.trim().to_string());

        trace!("Detail fields: name={:?} price={:?} address={:?}", name, price_text, address_text);

        RawItem { name, price_text, address_text, image_url: None }
    }

    /// Trimmed text of the first match, `None` when absent or blank.
    fn first_text(&self, document: &Html, selector: &scraper::Selector) -> Option<String> {
        document
            .select(selector)
            .next()
            .map(|e| e.text().collect::<String>().trim().to_string())
            .filter(|t| !t.is_empty())
    }

    /// Extracts the detail link and thumbnail from one ad card.
    ///
    /// Detail links are always built on the site origin. Cards whose href is
    /// not origin-relative (absolute or protocol-relative) are skipped.
    fn parse_card(&self, card: ElementRef) -> Option<ListingLink> {
        let href = card.select(&self.selectors.link).next()?.value().attr("href")?;

        if !href.starts_with('/') || href.starts_with("//") {
            debug!("Skipping ad card with non-relative href: {}", href);
            return None;
        }
        let detail_url = format!("{}{}", self.origin, href);

        let image_url = card
            .select(&self.selectors.image)
            .next()
            .and_then(|e| e.value().attr("src").map(String::from));

        Some(ListingLink { detail_url, image_url })
    }
}

/// A parsed listing page.
pub struct ListingPage<'p> {
    parser: &'p Parser,
    document: Html,
}

impl ListingPage<'_> {
    /// Number of ad cards on the page, including ones without a link.
    pub fn container_count(&self) -> usize {
        self.document.select(&self.parser.selectors.container).count()
    }

    /// Walks ad cards in document order, skipping cards without a link.
    pub fn links(&self) -> impl Iterator<Item = ListingLink> + '_ {
        self.document.select(&self.parser.selectors.container).filter_map(|card| {
            let link = self.parser.parse_card(card);
            if link.is_none() {
                debug!("Skipping ad card without a detail link");
            }
            link
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN: &str = "https://sn.coinafrique.com";

    fn card(href: Option<&str>, src: Option<&str>) -> String {
        let img = src.map(|s| format!(r#"<img class="ad__card-img" src="{}">"#, s)).unwrap_or_default();
        match href {
            Some(h) => format!(
                r#"<div class="col s6 m4 l3"><div class="card ad__card"><a class="card-image" href="{}">{}</a></div></div>"#,
                h, img
            ),
            None => format!(r#"<div class="col s6 m4 l3"><div class="card ad__card">{}</div></div>"#, img),
        }
    }

    #[test]
    fn test_listing_skips_card_without_anchor() {
        let html = format!(
            "<html><body><div class=\"row\">{}{}{}{}</div></body></html>",
            card(Some("/annonce/chiens/berger-1"), Some("https://img/1.jpg")),
            card(None, Some("https://img/x.jpg")),
            card(Some("/annonce/chiens/caniche-2"), None),
            card(Some("/annonce/chiens/boxer-3"), Some("https://img/3.jpg")),
        );

        let parser = Parser::new(ORIGIN);
        let page = parser.parse_listing(&html);
        assert_eq!(page.container_count(), 4);

        let links: Vec<_> = page.links().collect();
        assert_eq!(links.len(), 3);
        assert_eq!(links[0].detail_url, "https://sn.coinafrique.com/annonce/chiens/berger-1");
        assert_eq!(links[0].image_url.as_deref(), Some("https://img/1.jpg"));
        assert_eq!(links[1].detail_url, "https://sn.coinafrique.com/annonce/chiens/caniche-2");
        assert!(links[1].image_url.is_none());
        assert_eq!(links[2].detail_url, "https://sn.coinafrique.com/annonce/chiens/boxer-3");
    }

    #[test]
    fn test_listing_skips_off_site_links() {
        let html = format!(
            "<html><body>{}{}{}{}</body></html>",
            card(Some("https://evil.example/annonce/1"), None),
            card(Some("//cdn.example/annonce/2"), None),
            card(Some("annonce/3"), None),
            card(Some("/annonce/chiens/4"), None),
        );

        let parser = Parser::new(ORIGIN);
        let links: Vec<_> = parser.parse_listing(&html).links().collect();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].detail_url, "https://sn.coinafrique.com/annonce/chiens/4");
    }

    #[test]
    fn test_listing_anchor_without_href_is_skipped() {
        let html = r#"<div class="col s6 m4 l3"><a name="top">x</a></div>"#;
        let parser = Parser::new(ORIGIN);
        assert_eq!(parser.parse_listing(html).links().count(), 0);
    }

    #[test]
    fn test_listing_is_repeatable() {
        let html = card(Some("/annonce/1"), None);
        let parser = Parser::new(ORIGIN);
        let first: Vec<_> = parser.parse_listing(&html).links().collect();
        let second: Vec<_> = parser.parse_listing(&html).links().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_listing_without_containers() {
        let parser = Parser::new(ORIGIN);
        let page = parser.parse_listing("<html><body><p>Aucune annonce</p></body></html>");
        assert_eq!(page.container_count(), 0);
        assert_eq!(page.links().count(), 0);
    }

    #[test]
    fn test_origin_trailing_slash() {
        let parser = Parser::new("http://127.0.0.1:9000/");
        let links: Vec<_> = parser.parse_listing(&card(Some("/annonce/1"), None)).links().collect();
        assert_eq!(links[0].detail_url, "http://127.0.0.1:9000/annonce/1");
    }

    #[test]
    fn test_detail_all_fields() {
        let html = r#"
            <html><body>
                <h1 class="title title-ad hide-on-large-and-down">  Berger allemand 3 mois  </h1>
                <p class="price">150 000 CFA</p>
                <span class="valign-wrapper" data-address="Dakar, Sénégal"></span>
            </body></html>
        "#;

        let item = Parser::new(ORIGIN).parse_detail(html);
        assert_eq!(item.name.as_deref(), Some("Berger allemand 3 mois"));
        assert_eq!(item.price_text.as_deref(), Some("150 000 CFA"));
        assert_eq!(item.address_text.as_deref(), Some("Dakar, Sénégal"));
        assert!(item.image_url.is_none());
    }

    #[test]
    fn test_detail_missing_price() {
        let html = r#"
            <h1 class="title title-ad hide-on-large-and-down">Mouton Ladoum</h1>
            <span data-address="Thiès"></span>
        "#;

        let item = Parser::new(ORIGIN).parse_detail(html);
        assert_eq!(item.name.as_deref(), Some("Mouton Ladoum"));
        assert!(item.price_text.is_none());
        assert_eq!(item.address_text.as_deref(), Some("Thiès"));
    }

    #[test]
    fn test_detail_without_name_is_still_returned() {
        let html = r#"<p class="price">10 000 CFA</p>"#;
        let item = Parser::new(ORIGIN).parse_detail(html);
        assert!(item.name.is_none());
        assert_eq!(item.price_text.as_deref(), Some("10 000 CFA"));
    }

    #[test]
    fn test_detail_blank_title_is_none() {
        let html = r#"<h1 class="title title-ad hide-on-large-and-down">   </h1>"#;
        let item = Parser::new(ORIGIN).parse_detail(html);
        assert!(item.name.is_none());
    }

    #[test]
    fn test_detail_garbage_input() {
        let item = Parser::new(ORIGIN).parse_detail("<<<not html");
        assert_eq!(item, RawItem::default());
    }
}
