// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::form_data::{self, FormPart};
use crate::normalizer::{self, RawResponse};
use crate::observability;
use crate::options::{ClientConfig, DefaultOptions, ServiceInfo};
use crate::request::{FileData, RequestDescriptor};
use crate::request_builder::{self, ResolvedBody, ResolvedRequest};
use bytes::{Bytes, BytesMut};
use futures::stream::{BoxStream, Stream, StreamExt};
use gax::Result;
use gax::client_builder::Error as BuilderError;
use gax::error::Error;
use gax::options::RequestOptions;
use gax::response::{Payload, Response};
use http::{HeaderMap, StatusCode};
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tracing::Instrument;

/// Sends resolved requests.
///
/// The client uses [ReqwestTransport] by default. Tests, and applications
/// with special needs, can provide their own implementation.
#[async_trait::async_trait]
pub trait Transport: std::fmt::Debug + Send + Sync {
    /// Sends the request, returning once the response headers are received.
    async fn send(&self, request: ResolvedRequest) -> Result<TransportResponse>;
}

/// The response headers and the (not yet received) response body.
pub struct TransportResponse {
    pub status: StatusCode,
    pub reason: Option<String>,
    pub headers: HeaderMap,
    pub body: BoxStream<'static, Result<Bytes>>,
}

impl TransportResponse {
    /// Receives the full body.
    pub async fn into_raw(self) -> Result<RawResponse> {
        let mut body = self.body;
        let mut buffer = BytesMut::new();
        while let Some(chunk) = body.next().await {
            buffer.extend_from_slice(&chunk?);
        }
        Ok(RawResponse {
            status: self.status,
            reason: self.reason,
            headers: self.headers,
            body: buffer.freeze(),
        })
    }
}

impl std::fmt::Debug for TransportResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportResponse")
            .field("status", &self.status)
            .field("reason", &self.reason)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

/// A [Transport] based on [reqwest].
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    inner: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(inner: reqwest::Client) -> Self {
        Self { inner }
    }

    fn map_send_error(err: reqwest::Error) -> Error {
        match err {
            e if e.is_timeout() => Error::timeout(e),
            e => Error::io(e),
        }
    }
}

#[async_trait::async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: ResolvedRequest) -> Result<TransportResponse> {
        let mut builder = self
            .inner
            .request(request.method, request.url)
            .headers(request.headers);
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }
        builder = match request.body {
            None => builder,
            Some(ResolvedBody::Text(s)) => builder.body(s),
            Some(ResolvedBody::Binary(b)) => builder.body(b),
        };
        if !request.form.is_empty() {
            builder = builder.body(form_data::encode(&request.form));
        }
        if !request.form_data.is_empty() {
            builder = builder.multipart(to_multipart(request.form_data).await?);
        }

        let response = builder.send().await.map_err(Self::map_send_error)?;
        let status = response.status();
        let reason = reason_phrase(&response);
        let headers = response.headers().clone();
        let stream_headers = headers.clone();
        let body = response
            .bytes_stream()
            .map(move |chunk| chunk.map_err(|e| Error::transport(stream_headers.clone(), e)))
            .boxed();
        Ok(TransportResponse {
            status,
            reason,
            headers,
            body,
        })
    }
}

// Only set when the server sends a non-canonical reason phrase.
fn reason_phrase(response: &reqwest::Response) -> Option<String> {
    response
        .extensions()
        .get::<hyper::ext::ReasonPhrase>()
        .and_then(|r| std::str::from_utf8(r.as_bytes()).ok())
        .map(str::to_string)
}

async fn to_multipart(parts: Vec<(String, FormPart)>) -> Result<reqwest::multipart::Form> {
    let mut form = reqwest::multipart::Form::new();
    for (name, part) in parts {
        let part = match part {
            FormPart::Text(s) => reqwest::multipart::Part::text(s),
            FormPart::File {
                data,
                filename,
                content_type,
            } => {
                let bytes = match data {
                    FileData::Bytes(b) => b.to_vec(),
                    FileData::Path(p) => tokio::fs::read(&p).await.map_err(Error::ser)?,
                };
                let part = reqwest::multipart::Part::bytes(bytes)
                    .mime_str(&content_type)
                    .map_err(Error::ser)?;
                match filename {
                    Some(f) => part.file_name(f),
                    None => part,
                }
            }
        };
        form = form.part(name, part);
    }
    Ok(form)
}

/// Executes requests for a Watson service.
///
/// Generated clients create one of these, then call one of the `execute*`
/// functions for each operation. All three share the same validation,
/// request resolution, and error normalization.
#[derive(Clone, Debug)]
pub struct ReqwestClient {
    transport: Arc<dyn Transport>,
    defaults: Arc<DefaultOptions>,
    tracing: bool,
}

impl ReqwestClient {
    pub fn new(config: ClientConfig, service: ServiceInfo) -> gax::client_builder::Result<Self> {
        let tracing = crate::options::tracing_enabled(&config);
        let defaults = DefaultOptions::new(config, service)?;
        let inner = reqwest::Client::builder()
            .build()
            .map_err(BuilderError::transport)?;
        Ok(Self {
            transport: Arc::new(ReqwestTransport::new(inner)),
            defaults: Arc::new(defaults),
            tracing,
        })
    }

    /// Replaces the transport.
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = transport;
        self
    }

    /// Validates and resolves a request, without sending it.
    pub fn resolve(
        &self,
        descriptor: RequestDescriptor,
        options: &RequestOptions,
    ) -> Result<ResolvedRequest> {
        request_builder::resolve(&self.defaults, descriptor, options)
    }

    /// Sends the request and returns the normalized response.
    pub async fn execute(
        &self,
        descriptor: RequestDescriptor,
        options: RequestOptions,
    ) -> Result<Response<Payload>> {
        let span =
            observability::create_http_span(self.tracing, &self.defaults.service, &descriptor);
        let result = self
            .request_attempt(descriptor, &options)
            .instrument(span.clone())
            .await;
        observability::record_http_response(&span, &result);
        result
    }

    /// Sends the request in a background task, then calls `callback` with the
    /// normalized response.
    ///
    /// The callback is called exactly once, and never before this function
    /// returns. Must be called from within a tokio runtime.
    pub fn execute_with_callback<F>(
        &self,
        descriptor: RequestDescriptor,
        options: RequestOptions,
        callback: F,
    ) -> tokio::task::JoinHandle<()>
    where
        F: FnOnce(Result<Response<Payload>>) + Send + 'static,
    {
        let client = self.clone();
        tokio::spawn(async move {
            let result = client.execute(descriptor, options).await;
            callback(result);
        })
    }

    /// Sends the request and returns the response body as a stream of bytes.
    ///
    /// Nothing happens until the stream is polled. Errors, including missing
    /// parameters and service errors, are returned as the only item in the
    /// stream.
    pub fn execute_stream(
        &self,
        descriptor: RequestDescriptor,
        options: RequestOptions,
    ) -> ByteStream {
        let client = self.clone();
        let span =
            observability::create_http_span(self.tracing, &self.defaults.service, &descriptor);
        let open = async move { client.open_stream(descriptor, options).await }.instrument(span);
        let inner = futures::stream::once(open)
            .map(|r| match r {
                Ok(body) => body,
                Err(e) => futures::stream::once(futures::future::ready(Err(e))).boxed(),
            })
            .flatten()
            .boxed();
        ByteStream { inner }
    }

    async fn request_attempt(
        &self,
        descriptor: RequestDescriptor,
        options: &RequestOptions,
    ) -> Result<Response<Payload>> {
        let format = descriptor.error_format;
        let request = self.resolve(descriptor, options)?;
        let response = self.transport.send(request).await?;
        normalizer::normalize(response.into_raw().await?, format)
    }

    async fn open_stream(
        &self,
        descriptor: RequestDescriptor,
        options: RequestOptions,
    ) -> Result<BoxStream<'static, Result<Bytes>>> {
        let format = descriptor.error_format;
        let request = self.resolve(descriptor, &options)?;
        let response = self.transport.send(request).await?;
        if !normalizer::is_error_status(response.status, response.reason.as_deref()) {
            return Ok(response.body);
        }
        // Errors are small, buffer them to produce a normalized error.
        let raw = response.into_raw().await?;
        let body = raw.body.clone();
        match normalizer::normalize(raw, format) {
            Err(e) => Err(e),
            // Unreachable while is_error_status() agrees with the classifiers.
            Ok(_) => Ok(futures::stream::iter([Ok(body)]).boxed()),
        }
    }
}

/// The response body of [ReqwestClient::execute_stream].
pub struct ByteStream {
    inner: BoxStream<'static, Result<Bytes>>,
}

impl ByteStream {
    /// Receives the full body.
    pub async fn collect_bytes(mut self) -> Result<Bytes> {
        let mut buffer = BytesMut::new();
        while let Some(chunk) = self.inner.next().await {
            buffer.extend_from_slice(&chunk?);
        }
        Ok(buffer.freeze())
    }

    /// Receives the full body, as text.
    pub async fn collect_text(self) -> Result<String> {
        let bytes = self.collect_bytes().await?;
        String::from_utf8(bytes.to_vec()).map_err(Error::deser)
    }
}

impl Stream for ByteStream {
    type Item = Result<Bytes>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.poll_next_unpin(cx)
    }
}

impl std::fmt::Debug for ByteStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ByteStream").finish_non_exhaustive()
    }
}
