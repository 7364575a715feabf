//! PDF document assembly.
//!
//! Collects the finished content streams of one thickness group and wraps
//! them into a complete single-file PDF: catalog, page tree, one A4 page
//! per part and the two shared Helvetica Type1 fonts. The built-in fonts
//! are referenced by name with WinAnsiEncoding, so no font data is
//! embedded and the output stays small.

use pdf_writer::{Content, Finish, Name, Pdf, Rect, Ref};

use crate::layout::{PAGE_HEIGHT, PAGE_WIDTH};
use crate::text::Font;

/// An A4 multi-page document under construction, one page per part.
#[derive(Debug, Default)]
pub struct PageDocument {
    pages: Vec<Vec<u8>>,
}

impl PageDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one finished content stream as the next page.
    pub fn push_page(&mut self, content_stream: Vec<u8>) {
        self.pages.push(content_stream);
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Assemble the final PDF file.
    ///
    /// An empty document still produces a valid PDF with a single blank
    /// page, so a group whose every part failed still yields a file that
    /// opens.
    pub fn finish(mut self) -> Vec<u8> {
        if self.pages.is_empty() {
            self.pages.push(Content::new().finish());
        }

        let mut alloc = RefAllocator::default();
        let catalog_id = alloc.next();
        let page_tree_id = alloc.next();
        let font_regular_id = alloc.next();
        let font_bold_id = alloc.next();
        let ids: Vec<(Ref, Ref)> = self
            .pages
            .iter()
            .map(|_| (alloc.next(), alloc.next()))
            .collect();

        let mut pdf = Pdf::new();
        pdf.catalog(catalog_id).pages(page_tree_id);
        pdf.pages(page_tree_id)
            .kids(ids.iter().map(|(page_id, _)| *page_id))
            .count(self.pages.len() as i32);

        let media_box = Rect::new(0.0, 0.0, PAGE_WIDTH as f32, PAGE_HEIGHT as f32);
        for ((page_id, content_id), stream) in ids.iter().zip(&self.pages) {
            let mut page = pdf.page(*page_id);
            page.media_box(media_box);
            page.parent(page_tree_id);
            page.contents(*content_id);
            page.resources()
                .fonts()
                .pair(Name(Font::Regular.resource_name()), font_regular_id)
                .pair(Name(Font::Bold.resource_name()), font_bold_id);
            page.finish();
            pdf.stream(*content_id, stream);
        }

        pdf.type1_font(font_regular_id)
            .base_font(Name(b"Helvetica"))
            .encoding_predefined(Name(b"WinAnsiEncoding"));
        pdf.type1_font(font_bold_id)
            .base_font(Name(b"Helvetica-Bold"))
            .encoding_predefined(Name(b"WinAnsiEncoding"));

        pdf.finish()
    }
}

#[derive(Default)]
struct RefAllocator(i32);

impl RefAllocator {
    fn next(&mut self) -> Ref {
        self.0 += 1;
        Ref::new(self.0)
    }
}
