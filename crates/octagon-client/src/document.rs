use octagon_core::error::AppError;
use octagon_core::traits::{Document, Element, Parser};
use scraper::{ElementRef, Html, Selector};

/// HTML parser backed by the `scraper` crate (html5ever + CSS selectors).
#[derive(Debug, Clone, Copy, Default)]
pub struct ScraperParser;

impl ScraperParser {
    pub fn new() -> Self {
        Self
    }
}

impl Parser for ScraperParser {
    type Document = ScraperDocument;

    fn parse(&self, html: &str) -> ScraperDocument {
        ScraperDocument {
            html: Html::parse_document(html),
        }
    }
}

/// A parsed HTML page.
pub struct ScraperDocument {
    html: Html,
}

impl Document for ScraperDocument {
    type Element<'a> = ScraperElement<'a>;

    fn select(&self, selector: &str) -> Result<Vec<ScraperElement<'_>>, AppError> {
        let selector = parse_selector(selector)?;
        Ok(self.html.select(&selector).map(ScraperElement).collect())
    }
}

/// One element of a [`ScraperDocument`].
#[derive(Debug, Clone, Copy)]
pub struct ScraperElement<'a>(ElementRef<'a>);

impl Element for ScraperElement<'_> {
    fn select(&self, selector: &str) -> Result<Vec<Self>, AppError> {
        let selector = parse_selector(selector)?;
        Ok(self.0.select(&selector).map(ScraperElement).collect())
    }

    fn text(&self) -> String {
        self.0
            .text()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect()
    }

    fn attr(&self, name: &str) -> Option<String> {
        self.0.value().attr(name).map(str::to_string)
    }
}

fn parse_selector(selector: &str) -> Result<Selector, AppError> {
    Selector::parse(selector).map_err(|e| AppError::SelectorError {
        selector: selector.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"
        <table class="b-statistics__table">
          <thead>
            <tr class="b-statistics__table-row">
              <th>First</th><th>Last</th><th>Nickname</th>
            </tr>
          </thead>
          <tbody>
            <tr class="b-statistics__table-row"><td class="b-statistics__table-col_type_empty"></td></tr>
            <tr class="b-statistics__table-row">
              <td class="b-statistics__table-col">
                <a href="http://ufcstats.com/fighter-details/93fe7332d16c6ad9" class="b-link b-link_style_black">Tom</a>
              </td>
              <td class="b-statistics__table-col">
                <a href="http://ufcstats.com/fighter-details/93fe7332d16c6ad9" class="b-link b-link_style_black">Aaron</a>
              </td>
            </tr>
          </tbody>
        </table>"#;

    #[test]
    fn selects_in_document_order() {
        let doc = ScraperParser.parse(LISTING);
        let rows = doc.select("tr.b-statistics__table-row").unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1].select("td").unwrap().len(), 1);
        assert_eq!(rows[2].select("td").unwrap().len(), 2);
    }

    #[test]
    fn text_joins_trimmed_text_nodes() {
        let doc = ScraperParser.parse(
            r#"<ul><li class="b-list__box-list-item">
                <i class="b-list__box-item-title">Height:</i>
                5' 11"
            </li></ul>"#,
        );
        let item = doc.select_first("li.b-list__box-list-item").unwrap().unwrap();
        assert_eq!(item.text(), "Height:5' 11\"");
    }

    #[test]
    fn reads_attributes() {
        let doc = ScraperParser.parse(LISTING);
        let anchor = doc.select_first("td a").unwrap().unwrap();
        assert_eq!(
            anchor.attr("href").as_deref(),
            Some("http://ufcstats.com/fighter-details/93fe7332d16c6ad9")
        );
        assert_eq!(anchor.attr("title"), None);
    }

    #[test]
    fn invalid_selector_is_an_error() {
        let doc = ScraperParser.parse(LISTING);
        let err = doc.select("td[").unwrap_err();
        assert!(matches!(err, AppError::SelectorError { .. }));
    }
}
