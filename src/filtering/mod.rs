//! # Default Filtering, Ordering & Pagination
//!
//! Built-in strategies used by providers when neither the column nor the
//! provider registers its own:
//!
//! - **Search**: substring containment of the term in the value's text,
//!   case-insensitive unless the provider says otherwise
//! - **Order**: natural order of the value type, `null` last
//! - **Pagination**: `[start, start + length)` clamped to the filtered set
//!
//! ## Value text
//!
//! | JSON value | searched as |
//! |------------|-------------|
//! | string     | itself |
//! | number     | its decimal form (`2`, `1.5`) |
//! | bool       | `true` / `false` |
//! | array, object | compact JSON |
//! | null       | never matches |

pub mod pagination;
pub mod search;
pub mod sort;

pub use pagination::{DEFAULT_PAGE_LENGTH, page_range, paginate};
pub use search::{MAX_SEARCH_VALUE_LENGTH, contains_term, search_text, truncate_search_value};
pub use sort::{compare_values, compare_with_direction};
