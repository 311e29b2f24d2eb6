use serde::Serialize;
use utoipa::ToSchema;

use super::QuoteError;
use crate::cart::LineItem;

/// Item rows that fit in the content box of one A4 page at the quote's
/// font size.
pub const DEFAULT_ITEMS_PER_PAGE: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PageKind {
    /// Seller block, quote metadata and the first slice of items.
    Header,
    /// Overflow items with the table header repeated.
    Continuation,
    /// Grand total, terms, contact instructions and signature.
    Summary,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlannedPage<'a> {
    /// 1-based position in the document.
    pub number: usize,
    pub kind: PageKind,
    pub items: &'a [LineItem],
    /// Index of `items[0]` in the full item list.
    pub first_item: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PagePlan<'a> {
    pages: Vec<PlannedPage<'a>>,
    items_per_page: usize,
}

impl<'a> PagePlan<'a> {
    pub fn pages(&self) -> &[PlannedPage<'a>] {
        &self.pages
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn items_per_page(&self) -> usize {
        self.items_per_page
    }

    pub fn item_pages(&self) -> impl Iterator<Item = &PlannedPage<'a>> {
        self.pages
            .iter()
            .filter(|page| page.kind != PageKind::Summary)
    }
}

/// Split `items` into a header page, continuation pages and a trailing
/// summary page. Items keep their order and are never split across pages.
///
/// Callers must reject empty carts before getting here.
pub fn paginate(items: &[LineItem], items_per_page: usize) -> Result<PagePlan<'_>, QuoteError> {
    if items_per_page == 0 {
        return Err(QuoteError::InvalidCapacity);
    }
    if items.is_empty() {
        return Err(QuoteError::EmptyCart);
    }

    let mut pages: Vec<PlannedPage<'_>> = items
        .chunks(items_per_page)
        .enumerate()
        .map(|(index, chunk)| PlannedPage {
            number: index + 1,
            kind: if index == 0 {
                PageKind::Header
            } else {
                PageKind::Continuation
            },
            items: chunk,
            first_item: index * items_per_page,
        })
        .collect();

    pages.push(PlannedPage {
        number: pages.len() + 1,
        kind: PageKind::Summary,
        items: &[],
        first_item: items.len(),
    });

    Ok(PagePlan {
        pages,
        items_per_page,
    })
}

/// Pages produced for `total_items` lines: the header page, the
/// continuation pages and the summary page.
pub fn page_count(total_items: usize, items_per_page: usize) -> usize {
    let per_page = items_per_page.max(1);
    1 + total_items.saturating_sub(per_page).div_ceil(per_page) + 1
}
