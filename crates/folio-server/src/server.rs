//! The hyper serving loop: one spawned task per accepted connection,
//! http/1.1 only.

use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;

use bytes::Bytes;
use folio_core::{Handler, Request, Response};
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::Service;
use hyper_util::rt::TokioIo;
use tokio::net::{TcpListener, TcpStream};
use tracing::{error, info};

pub struct HttpServer {
	handler: Arc<dyn Handler>,
}

impl HttpServer {
	pub fn new(handler: Arc<dyn Handler>) -> Self {
		Self { handler }
	}

	/// Bind and serve until the process is stopped
	pub async fn listen(self, addr: SocketAddr) -> anyhow::Result<()> {
		let listener = TcpListener::bind(addr).await?;
		info!(%addr, "listening");

		loop {
			let (stream, remote_addr) = listener.accept().await?;
			let handler = self.handler.clone();
			tokio::task::spawn(async move {
				if let Err(e) = Self::handle_connection(stream, remote_addr, handler).await {
					error!(%remote_addr, error = %e, "connection error");
				}
			});
		}
	}

	async fn handle_connection(
		stream: TcpStream,
		remote_addr: SocketAddr,
		handler: Arc<dyn Handler>,
	) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
		let io = TokioIo::new(stream);
		let service = RequestService {
			handler,
			remote_addr,
		};
		http1::Builder::new().serve_connection(io, service).await?;
		Ok(())
	}
}

struct RequestService {
	handler: Arc<dyn Handler>,
	remote_addr: SocketAddr,
}

impl Service<hyper::Request<Incoming>> for RequestService {
	type Response = hyper::Response<Full<Bytes>>;
	type Error = Box<dyn std::error::Error + Send + Sync>;
	type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

	fn call(&self, req: hyper::Request<Incoming>) -> Self::Future {
		let handler = self.handler.clone();
		let remote_addr = self.remote_addr;

		Box::pin(async move {
			let (parts, body) = req.into_parts();
			let body = body.collect().await?.to_bytes();

			let mut request = Request::new(
				parts.method,
				parts.uri,
				parts.version,
				parts.headers,
				body,
			);
			request.remote_addr = Some(remote_addr);
			let path = request.path_and_query();

			let response = match handler.handle(request).await {
				Ok(response) => response,
				Err(e) => {
					let status = e.status();
					if status.is_server_error() {
						error!(path = %path, error = %e, "handler error");
					}
					Response::new(status).with_body(e.to_string())
				}
			};

			let mut builder = hyper::Response::builder().status(response.status);
			if let Some(headers) = builder.headers_mut() {
				headers.extend(response.headers);
			}
			Ok(builder.body(Full::new(response.body))?)
		})
	}
}
