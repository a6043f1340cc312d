/// Participation of a column in the global search.
///
/// Providers apply per-column searches regardless of this flag. Protocol
/// parsers drop client column searches on [`Searchable::None`] columns before
/// they reach the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Searchable {
    /// Defer to the provider's policy for default columns
    #[default]
    Default,
    /// Always take part in the global search
    All,
    /// Never take part in the global search
    None,
}

impl Searchable {
    /// Whether a column with this setting is searched globally, given the
    /// provider's policy for `Default` columns.
    #[must_use]
    pub fn is_globally_searchable(self, search_default_columns: bool) -> bool {
        match self {
            Self::Default => search_default_columns,
            Self::All => true,
            Self::None => false,
        }
    }
}
