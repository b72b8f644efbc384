use std::collections::HashMap;
use std::net::SocketAddr;

use bytes::Bytes;
use hyper::header::{CONTENT_TYPE, COOKIE};
use hyper::{HeaderMap, Method, Uri, Version};
use percent_encoding::percent_decode_str;

use crate::error::{Error, Result};

/// Owned HTTP request as seen by handlers
#[derive(Debug)]
pub struct Request {
	pub method: Method,
	pub uri: Uri,
	pub version: Version,
	pub headers: HeaderMap,
	pub body: Bytes,
	/// Parameters extracted from `{name}` segments by the router
	pub path_params: HashMap<String, String>,
	/// Raw (still percent-encoded) query parameters
	pub query_params: HashMap<String, String>,
	pub remote_addr: Option<SocketAddr>,
}

impl Request {
	pub fn new(
		method: Method,
		uri: Uri,
		version: Version,
		headers: HeaderMap,
		body: Bytes,
	) -> Self {
		let query_params = parse_query_params(&uri);
		Self {
			method,
			uri,
			version,
			headers,
			body,
			path_params: HashMap::new(),
			query_params,
			remote_addr: None,
		}
	}

	/// Start building a request, mostly useful in tests
	///
	/// # Examples
	///
	/// ```
	/// use folio_core::Request;
	/// use hyper::Method;
	///
	/// let request = Request::builder()
	///     .method(Method::GET)
	///     .uri("/blog/")
	///     .build()
	///     .unwrap();
	/// assert_eq!(request.path(), "/blog/");
	/// ```
	pub fn builder() -> RequestBuilder {
		RequestBuilder::default()
	}

	/// Request path without the query string
	pub fn path(&self) -> &str {
		self.uri.path()
	}

	/// Path plus query string, as originally requested
	pub fn path_and_query(&self) -> String {
		self.uri
			.path_and_query()
			.map(|pq| pq.to_string())
			.unwrap_or_else(|| self.uri.path().to_string())
	}

	/// A single query parameter, URL-decoded
	pub fn query_param(&self, name: &str) -> Option<String> {
		self.query_params
			.get(name)
			.map(|raw| percent_decode_str(raw).decode_utf8_lossy().replace('+', " "))
	}

	/// Parameter captured from a `{name}` path segment
	pub fn path_param(&self, name: &str) -> Option<&str> {
		self.path_params.get(name).map(String::as_str)
	}

	pub fn set_path_param(&mut self, key: impl Into<String>, value: impl Into<String>) {
		self.path_params.insert(key.into(), value.into());
	}

	/// The `Content-Type` header, when present and valid UTF-8
	pub fn content_type(&self) -> Option<&str> {
		self.headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok())
	}

	/// Parse an `application/x-www-form-urlencoded` body into a map.
	///
	/// # Examples
	///
	/// ```
	/// use folio_core::Request;
	/// use hyper::Method;
	///
	/// let request = Request::builder()
	///     .method(Method::POST)
	///     .uri("/")
	///     .form(&[("form_type", "formTwo"), ("email", "a@b.c")])
	///     .build()
	///     .unwrap();
	///
	/// let data = request.form_data().unwrap();
	/// assert_eq!(data.get("email").map(String::as_str), Some("a@b.c"));
	/// ```
	pub fn form_data(&self) -> Result<HashMap<String, String>> {
		serde_urlencoded::from_bytes(&self.body)
			.map_err(|e| Error::BadRequest(format!("malformed form body: {}", e)))
	}

	/// Value of a cookie from the `Cookie` header
	pub fn cookie(&self, name: &str) -> Option<String> {
		let header = self.headers.get(COOKIE)?.to_str().ok()?;
		header.split(';').find_map(|pair| {
			let mut parts = pair.trim().splitn(2, '=');
			match (parts.next(), parts.next()) {
				(Some(key), Some(value)) if key == name => Some(value.to_string()),
				_ => None,
			}
		})
	}
}

fn parse_query_params(uri: &Uri) -> HashMap<String, String> {
	uri.query()
		.map(|q| {
			q.split('&')
				.filter_map(|pair| {
					// split on the first '=' only, values may contain '='
					let mut parts = pair.splitn(2, '=');
					Some((
						parts.next()?.to_string(),
						parts.next().unwrap_or("").to_string(),
					))
				})
				.collect()
		})
		.unwrap_or_default()
}

/// Builder for [`Request`]
#[derive(Debug, Default)]
pub struct RequestBuilder {
	method: Option<Method>,
	uri: Option<String>,
	headers: HeaderMap,
	body: Bytes,
	remote_addr: Option<SocketAddr>,
}

impl RequestBuilder {
	pub fn method(mut self, method: Method) -> Self {
		self.method = Some(method);
		self
	}

	pub fn uri(mut self, uri: impl Into<String>) -> Self {
		self.uri = Some(uri.into());
		self
	}

	pub fn headers(mut self, headers: HeaderMap) -> Self {
		self.headers = headers;
		self
	}

	pub fn header(mut self, name: &'static str, value: &str) -> Self {
		if let Ok(value) = value.parse() {
			self.headers.insert(name, value);
		}
		self
	}

	pub fn body(mut self, body: impl Into<Bytes>) -> Self {
		self.body = body.into();
		self
	}

	/// Set an urlencoded form body along with its content type
	pub fn form(mut self, fields: &[(&str, &str)]) -> Self {
		let encoded = serde_urlencoded::to_string(fields).unwrap_or_default();
		self.body = Bytes::from(encoded);
		if let Ok(value) = "application/x-www-form-urlencoded".parse() {
			self.headers.insert(CONTENT_TYPE, value);
		}
		self
	}

	pub fn remote_addr(mut self, addr: SocketAddr) -> Self {
		self.remote_addr = Some(addr);
		self
	}

	pub fn build(self) -> Result<Request> {
		let uri: Uri = self
			.uri
			.unwrap_or_else(|| "/".to_string())
			.parse()
			.map_err(|e| Error::BadRequest(format!("invalid uri: {}", e)))?;
		let mut request = Request::new(
			self.method.unwrap_or(Method::GET),
			uri,
			Version::HTTP_11,
			self.headers,
			self.body,
		);
		request.remote_addr = self.remote_addr;
		Ok(request)
	}
}
