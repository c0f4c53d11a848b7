//! Fixed-size feed pagination.
//!
//! Page numbers are 1-based. Page `n` covers offsets `(n-1)*size .. n*size`
//! of the ordered scope; a page past the end is empty rather than an error,
//! and an empty scope still reports a single (empty) page.

use actix_web::dev::Payload;
use actix_web::{Error, FromRequest, HttpRequest};
use serde::{Deserialize, Serialize};
use std::future::{ready, Ready};

/// Raw `?page=` query parameter. Anything that is not a positive integer
/// falls back to the first page.
///
/// Extracted straight from the query string so a malformed or repeated
/// parameter never rejects the request.
#[derive(Debug, Default)]
pub struct PageQuery {
    pub page: Option<String>,
}

impl PageQuery {
    /// Last `page` value of a raw query string.
    pub fn from_query(query: &str) -> Self {
        let page = query
            .split('&')
            .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
            .filter(|(key, _)| *key == "page")
            .last()
            .and_then(|(_, raw)| {
                urlencoding::decode(&raw.replace('+', " "))
                    .ok()
                    .map(|v| v.into_owned())
            });
        Self { page }
    }

    pub fn number(&self) -> u64 {
        self.page
            .as_deref()
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .filter(|n| *n >= 1)
            .unwrap_or(1)
    }
}

/// Page geometry for one feed, configured once per process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    page_size: u64,
}

impl Paginator {
    /// `page_size` is clamped to at least one item.
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1) as u64,
        }
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// LIMIT/OFFSET window for `number`.
    pub fn window(&self, number: u64) -> (i64, i64) {
        let number = number.max(1);
        let offset = (number - 1).saturating_mul(self.page_size);
        (self.page_size as i64, offset.min(i64::MAX as u64) as i64)
    }

    pub fn num_pages(&self, count: u64) -> u64 {
        if count == 0 {
            1
        } else {
            count.div_ceil(self.page_size)
        }
    }

    /// Wrap the already-sliced `items` with the page metadata.
    pub fn page<T>(&self, number: u64, count: u64, items: Vec<T>) -> Page<T> {
        let number = number.max(1);
        let num_pages = self.num_pages(count);

        Page {
            number,
            num_pages,
            count,
            has_next: number < num_pages,
            has_previous: number > 1,
            object_list: items,
        }
    }
}

impl FromRequest for PageQuery {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(Ok(Self::from_query(req.query_string())))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub number: u64,
    pub num_pages: u64,
    pub count: u64,
    pub has_next: bool,
    pub has_previous: bool,
    pub object_list: Vec<T>,
}

impl<T> Page<T> {
    pub fn len(&self) -> usize {
        self.object_list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.object_list.is_empty()
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            number: self.number,
            num_pages: self.num_pages,
            count: self.count,
            has_next: self.has_next,
            has_previous: self.has_previous,
            object_list: self.object_list.into_iter().map(f).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Slice `0..total` the way a store would for `number`.
    fn slice(paginator: &Paginator, total: u64, number: u64) -> Vec<u64> {
        let (limit, offset) = paginator.window(number);
        (0..total)
            .skip(offset as usize)
            .take(limit as usize)
            .collect()
    }

    #[test]
    fn test_thirteen_items_page_size_ten() {
        let paginator = Paginator::new(10);
        assert_eq!(slice(&paginator, 13, 1).len(), 10);
        assert_eq!(slice(&paginator, 13, 2), vec![10, 11, 12]);
        assert!(slice(&paginator, 13, 3).is_empty());
        assert_eq!(paginator.num_pages(13), 2);
    }

    #[test]
    fn test_page_sizes_hold_for_all_totals() {
        for size in 1..=7u64 {
            let paginator = Paginator::new(size as usize);
            for total in 0..=30u64 {
                let last = total.div_ceil(size);
                assert_eq!(slice(&paginator, total, 1).len() as u64, size.min(total));
                if last > 0 {
                    assert_eq!(
                        slice(&paginator, total, last).len() as u64,
                        total - size * (last - 1)
                    );
                }
                assert!(slice(&paginator, total, last + 1).is_empty());
            }
        }
    }

    #[test]
    fn test_page_metadata() {
        let paginator = Paginator::new(10);

        let first = paginator.page(1, 13, vec![(); 10]);
        assert!(first.has_next);
        assert!(!first.has_previous);
        assert_eq!(first.num_pages, 2);

        let second = paginator.page(2, 13, vec![(); 3]);
        assert!(!second.has_next);
        assert!(second.has_previous);

        let beyond = paginator.page(3, 13, Vec::<()>::new());
        assert!(beyond.is_empty());
        assert!(!beyond.has_next);
    }

    #[test]
    fn test_empty_scope_has_one_page() {
        let paginator = Paginator::new(10);
        let page = paginator.page(1, 0, Vec::<()>::new());
        assert_eq!(page.num_pages, 1);
        assert!(!page.has_next);
        assert!(page.is_empty());
    }

    #[test]
    fn test_page_query_falls_back_to_first_page() {
        let q = |raw: Option<&str>| PageQuery {
            page: raw.map(str::to_string),
        };
        assert_eq!(q(None).number(), 1);
        assert_eq!(q(Some("2")).number(), 2);
        assert_eq!(q(Some(" 3 ")).number(), 3);
        assert_eq!(q(Some("0")).number(), 1);
        assert_eq!(q(Some("-4")).number(), 1);
        assert_eq!(q(Some("last")).number(), 1);
    }

    #[test]
    fn test_page_query_from_raw_query_string() {
        assert_eq!(PageQuery::from_query("").number(), 1);
        assert_eq!(PageQuery::from_query("page=3").number(), 3);
        assert_eq!(PageQuery::from_query("page=2&page=1").number(), 1);
        assert_eq!(PageQuery::from_query("page=1&page=2").number(), 2);
        assert_eq!(PageQuery::from_query("sort=new&page=%32").number(), 2);
        assert_eq!(PageQuery::from_query("page").number(), 1);
        assert_eq!(PageQuery::from_query("page=%zz").number(), 1);
        assert_eq!(PageQuery::from_query("pages=4").number(), 1);
    }

    #[test]
    fn test_zero_page_size_is_clamped() {
        assert_eq!(Paginator::new(0).page_size(), 1);
    }

    #[test]
    fn test_huge_page_number_does_not_overflow() {
        let paginator = Paginator::new(10);
        let (limit, offset) = paginator.window(u64::MAX);
        assert_eq!(limit, 10);
        assert_eq!(offset, i64::MAX);
    }
}
