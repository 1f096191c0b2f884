//! Access to paginated text sources.
//!
//! The estimator and validator only ever see the [`PageSource`] trait, so the
//! PDF backend can be swapped for in-memory fixtures in tests. Extraction
//! failures surface as a typed [`Unavailable`] reason rather than aborting.

use crate::Result;
use lopdf::Document;
use std::path::Path;

/// Why text for a page could not be produced
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Unavailable {
    #[error("page index {page_index} out of range (document has {page_count} pages)")]
    OutOfRange { page_index: usize, page_count: usize },

    #[error("text extraction failed: {0}")]
    Extraction(String),
}

/// A paginated text source
///
/// Page indices are 0-based.
pub trait PageSource {
    fn page_count(&self) -> usize;

    fn page_text(&self, page_index: usize) -> std::result::Result<String, Unavailable>;
}

/// A PDF-backed book
pub struct PdfBook {
    doc: Document,
    // lopdf page numbers in document order; index 0 is the first page
    page_numbers: Vec<u32>,
}

impl PdfBook {
    /// Open a PDF file from disk
    pub fn open(path: &Path) -> Result<Self> {
        let doc = Document::load(path)?;
        let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
        tracing::debug!("Opened PDF {:?} with {} pages", path, page_numbers.len());
        Ok(Self { doc, page_numbers })
    }
}

impl PageSource for PdfBook {
    fn page_count(&self) -> usize {
        self.page_numbers.len()
    }

    fn page_text(&self, page_index: usize) -> std::result::Result<String, Unavailable> {
        let page_number =
            self.page_numbers
                .get(page_index)
                .copied()
                .ok_or(Unavailable::OutOfRange {
                    page_index,
                    page_count: self.page_numbers.len(),
                })?;

        self.doc
            .extract_text(&[page_number])
            .map_err(|e| Unavailable::Extraction(e.to_string()))
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::{PageSource, Unavailable};
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};
    use std::path::Path;

    /// In-memory page source for estimator and validator tests
    ///
    /// `None` entries model pages whose extraction fails.
    pub struct StubSource {
        pub pages: Vec<Option<String>>,
    }

    impl StubSource {
        pub fn new(pages: Vec<Option<&str>>) -> Self {
            Self {
                pages: pages
                    .into_iter()
                    .map(|p| p.map(|s| s.to_string()))
                    .collect(),
            }
        }
    }

    impl PageSource for StubSource {
        fn page_count(&self) -> usize {
            self.pages.len()
        }

        fn page_text(&self, page_index: usize) -> Result<String, Unavailable> {
            match self.pages.get(page_index) {
                Some(Some(text)) => Ok(text.clone()),
                Some(None) => Err(Unavailable::Extraction("stubbed failure".into())),
                None => Err(Unavailable::OutOfRange {
                    page_index,
                    page_count: self.pages.len(),
                }),
            }
        }
    }

    /// Write a minimal PDF with one page of text per entry to `path`
    pub fn write_test_pdf(path: &Path, page_texts: &[&str]) {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        for text in page_texts {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 12.into()]),
                    Operation::new("Td", vec![50.into(), 750.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.save(path).unwrap();
    }
}
