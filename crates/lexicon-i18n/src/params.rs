//! Message parameters

use indexmap::IndexMap;

/// Named parameters for a rendering call.
///
/// Insertion order is preserved; the diagnostic fallback prints parameters
/// in that order.
pub type Params = IndexMap<String, String>;

/// Builds a [`Params`] map from `name => value` pairs.
///
/// ```rust
/// use lexicon_i18n::params;
///
/// let params = params! { "name" => "Sam", "count" => 3 };
/// assert_eq!(params["count"], "3");
/// assert!(params!().is_empty());
/// ```
#[macro_export]
macro_rules! params {
    () => {
        $crate::Params::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut params = $crate::Params::new();
        $(
            params.insert(::std::string::ToString::to_string(&$key), ::std::string::ToString::to_string(&$value));
        )+
        params
    }};
}
