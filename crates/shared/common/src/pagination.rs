//! Paging arithmetic shared by list views.

/// Number of pages needed for `total` records at `page_size` per page.
///
/// A page size of zero means "everything on one page": one page when
/// there is anything to show, none otherwise.
pub fn page_count(total: u64, page_size: u64) -> u64 {
    if page_size > 0 {
        total.div_ceil(page_size)
    } else if total > 0 {
        1
    } else {
        0
    }
}
