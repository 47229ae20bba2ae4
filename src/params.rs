//! Multi-value parameter maps for query strings and form bodies.

use std::collections::BTreeMap;
use url::form_urlencoded;

/// An ordered mapping from parameter name to one or more values.
///
/// Names are kept sorted; values under a single name keep the order they
/// were added in. [`Params::encode`] renders the map as
/// `application/x-www-form-urlencoded` text.
///
/// # Examples
///
/// ```
/// use easyreq::Params;
///
/// let mut params = Params::new();
/// params.append("b", "2");
/// params.append("a", "1");
/// params.append("a", "one");
///
/// assert_eq!(params.encode(), "a=1&a=one&b=2");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    inner: BTreeMap<String, Vec<String>>,
}

impl Params {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `value` to the values stored under `key`.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.inner.entry(key.into()).or_default().push(value.into());
    }

    /// Replaces every value stored under `key` with `value`.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.inner.insert(key.into(), vec![value.into()]);
    }

    /// Returns the first value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.inner.get(key)?.first().map(String::as_str)
    }

    /// Returns all values stored under `key`.
    pub fn get_all(&self, key: &str) -> &[String] {
        self.inner.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    /// Removes `key` and all of its values.
    pub fn remove(&mut self, key: &str) -> Option<Vec<String>> {
        self.inner.remove(key)
    }

    /// Returns `true` if no parameters are present.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Iterates over every `(name, value)` pair in encoding order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner
            .iter()
            .flat_map(|(k, vs)| vs.iter().map(move |v| (k.as_str(), v.as_str())))
    }

    /// Encodes the map as `application/x-www-form-urlencoded` text.
    pub fn encode(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.iter())
            .finish()
    }
}

impl<K, V> FromIterator<(K, V)> for Params
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        params.extend(iter);
        params
    }
}

impl<K, V> Extend<(K, V)> for Params
where
    K: Into<String>,
    V: Into<String>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.append(k, v);
        }
    }
}
