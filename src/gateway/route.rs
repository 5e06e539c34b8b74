//! Path helpers for HTTP front-ends mounting the gateway.

// self
use crate::config::RoutePrefixes;

/// Gateway operation addressed by an inbound request path, carrying the path tail.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route<'a> {
	/// Register or fetch the remote resource named by a raw URL.
	Remote(&'a str),
	/// Issue a token for a registry entry.
	Proxy(&'a str),
	/// Issue a disposable token for a raw URL.
	Disposable(&'a str),
	/// Consume a token.
	Fuse(&'a str),
}
impl<'a> Route<'a> {
	/// Path tail following the route prefix.
	pub fn tail(&self) -> &'a str {
		match *self {
			Route::Remote(tail)
			| Route::Proxy(tail)
			| Route::Disposable(tail)
			| Route::Fuse(tail) => tail,
		}
	}
}

impl RoutePrefixes {
	/// Splits `path` against the configured prefixes.
	///
	/// URL-carrying routes keep every remaining segment. Identifier routes accept exactly one
	/// segment. Empty tails never resolve.
	pub fn resolve<'a>(&self, path: &'a str) -> Option<Route<'a>> {
		fn tail<'a>(path: &'a str, prefix: &str) -> Option<&'a str> {
			path.strip_prefix(prefix)?.strip_prefix('/').filter(|tail| !tail.is_empty())
		}

		let single = |tail: &&str| !tail.contains('/');

		if let Some(tail) = tail(path, &self.remote) {
			return Some(Route::Remote(tail));
		}
		if let Some(tail) = tail(path, &self.disposable) {
			return Some(Route::Disposable(tail));
		}
		if let Some(tail) = tail(path, &self.proxy).filter(single) {
			return Some(Route::Proxy(tail));
		}

		tail(path, &self.fuse).filter(single).map(Route::Fuse)
	}
}

/// Rebuilds the raw target URL from a URL-carrying path tail and the inbound query string.
pub fn raw_url_from_route(tail: &str, query: Option<&str>) -> String {
	match query.filter(|query| !query.is_empty()) {
		Some(query) => format!("{tail}?{query}"),
		None => tail.to_owned(),
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn resolve_splits_default_prefixes() {
		let routes = RoutePrefixes::default();

		assert_eq!(
			routes.resolve("/remote/https://example.com/a/b"),
			Some(Route::Remote("https://example.com/a/b"))
		);
		assert_eq!(
			routes.resolve("/disposable/https://httpbin.example/anything"),
			Some(Route::Disposable("https://httpbin.example/anything"))
		);
		assert_eq!(routes.resolve("/proxy/abc123"), Some(Route::Proxy("abc123")));
		assert_eq!(routes.resolve("/fuse/tok"), Some(Route::Fuse("tok")));
		assert_eq!(routes.resolve("/fuse/tok").map(|route| route.tail()), Some("tok"));
	}

	#[test]
	fn resolve_rejects_partial_or_nested_matches() {
		let routes = RoutePrefixes::default();

		assert_eq!(routes.resolve("/fuse"), None);
		assert_eq!(routes.resolve("/fuse/"), None);
		assert_eq!(routes.resolve("/fuses/tok"), None);
		assert_eq!(routes.resolve("/fuse/tok/extra"), None);
		assert_eq!(routes.resolve("/unknown/tok"), None);
	}

	#[test]
	fn raw_url_appends_non_empty_query_only() {
		assert_eq!(
			raw_url_from_route("https://httpbin.example/anything", Some("meh=lol")),
			"https://httpbin.example/anything?meh=lol"
		);
		assert_eq!(raw_url_from_route("https://example.com/a", Some("")), "https://example.com/a");
		assert_eq!(raw_url_from_route("https://example.com/a", None), "https://example.com/a");
	}
}
