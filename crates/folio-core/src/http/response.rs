use bytes::Bytes;
use hyper::header::{CONTENT_DISPOSITION, CONTENT_TYPE, LOCATION, SET_COOKIE};
use hyper::{HeaderMap, StatusCode};

/// Owned HTTP response produced by handlers
#[derive(Debug)]
pub struct Response {
	pub status: StatusCode,
	pub headers: HeaderMap,
	pub body: Bytes,
}

impl Response {
	pub fn new(status: StatusCode) -> Self {
		Self {
			status,
			headers: HeaderMap::new(),
			body: Bytes::new(),
		}
	}

	/// HTTP 200 OK
	///
	/// # Examples
	///
	/// ```
	/// use folio_core::Response;
	/// use hyper::StatusCode;
	///
	/// assert_eq!(Response::ok().status, StatusCode::OK);
	/// ```
	pub fn ok() -> Self {
		Self::new(StatusCode::OK)
	}

	pub fn bad_request() -> Self {
		Self::new(StatusCode::BAD_REQUEST)
	}

	pub fn unauthorized() -> Self {
		Self::new(StatusCode::UNAUTHORIZED)
	}

	pub fn forbidden() -> Self {
		Self::new(StatusCode::FORBIDDEN)
	}

	pub fn not_found() -> Self {
		Self::new(StatusCode::NOT_FOUND).with_body("Not Found")
	}

	pub fn method_not_allowed() -> Self {
		Self::new(StatusCode::METHOD_NOT_ALLOWED)
	}

	pub fn internal_server_error() -> Self {
		Self::new(StatusCode::INTERNAL_SERVER_ERROR).with_body("Internal Server Error")
	}

	/// HTTP 302 with a `Location` header
	///
	/// # Examples
	///
	/// ```
	/// use folio_core::Response;
	/// use hyper::StatusCode;
	///
	/// let response = Response::redirect("/login?next=%2Fadmin%2F");
	/// assert_eq!(response.status, StatusCode::FOUND);
	/// assert_eq!(response.header("location"), Some("/login?next=%2Fadmin%2F"));
	/// ```
	pub fn redirect(location: &str) -> Self {
		let mut response = Self::new(StatusCode::FOUND);
		if let Ok(value) = location.parse() {
			response.headers.insert(LOCATION, value);
		}
		response
	}

	pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
		self.body = body.into();
		self
	}

	/// Set an HTML body with the matching content type
	pub fn with_html(self, body: impl Into<Bytes>) -> Self {
		self.with_header(CONTENT_TYPE.as_str(), "text/html; charset=utf-8")
			.with_body(body)
	}

	pub fn with_header(mut self, name: &str, value: &str) -> Self {
		if let (Ok(name), Ok(value)) = (
			hyper::header::HeaderName::try_from(name),
			hyper::header::HeaderValue::try_from(value),
		) {
			self.headers.insert(name, value);
		}
		self
	}

	/// Mark the body as a file download
	pub fn as_attachment(self, filename: &str) -> Self {
		let disposition = format!("attachment; filename=\"{}\"", filename);
		self.with_header(CONTENT_DISPOSITION.as_str(), &disposition)
	}

	/// Append a `Set-Cookie` header (appends, never replaces)
	pub fn with_cookie(mut self, cookie: &str) -> Self {
		if let Ok(value) = cookie.parse() {
			self.headers.append(SET_COOKIE, value);
		}
		self
	}

	/// A header value as a string, when present and valid UTF-8
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers.get(name).and_then(|v| v.to_str().ok())
	}

	pub fn is_redirect(&self) -> bool {
		self.status.is_redirection()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn attachment_sets_content_disposition() {
		let response = Response::ok()
			.with_body(b"pdf bytes".as_ref())
			.as_attachment("resume1.pdf");
		assert_eq!(
			response.header("content-disposition"),
			Some("attachment; filename=\"resume1.pdf\"")
		);
	}

	#[test]
	fn cookies_append() {
		let response = Response::ok()
			.with_cookie("sessionid=a; Path=/; HttpOnly")
			.with_cookie("theme=dark; Path=/");
		assert_eq!(response.headers.get_all(SET_COOKIE).iter().count(), 2);
	}

	#[test]
	fn html_body_has_content_type() {
		let response = Response::ok().with_html("<h1>hi</h1>");
		assert_eq!(
			response.header("content-type"),
			Some("text/html; charset=utf-8")
		);
	}
}
