//! Hand-maintained subset of the `authzed.api.v1` protocol: the schema write call.

use tonic::codegen::{http, Body, Bytes, StdError};

/// Request for `SchemaService/WriteSchema`
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct WriteSchemaRequest {
    /// Full schema text; replaces any existing schema
    #[prost(string, tag = "1")]
    pub schema: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct WriteSchemaResponse {
    #[prost(message, optional, tag = "1")]
    pub written_at: Option<ZedToken>,
}

/// Consistency token returned by write calls
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ZedToken {
    #[prost(string, tag = "1")]
    pub token: String,
}

/// Client for `authzed.api.v1.SchemaService`
#[derive(Debug, Clone)]
pub struct SchemaServiceClient<T> {
    inner: tonic::client::Grpc<T>,
}

impl<T> SchemaServiceClient<T>
where
    T: tonic::client::GrpcService<tonic::body::Body>,
    T::Error: Into<StdError>,
    T::ResponseBody: Body<Data = Bytes> + Send + 'static,
    <T::ResponseBody as Body>::Error: Into<StdError> + Send,
{
    pub fn new(inner: T) -> Self {
        Self {
            inner: tonic::client::Grpc::new(inner),
        }
    }

    pub async fn write_schema(
        &mut self,
        request: impl tonic::IntoRequest<WriteSchemaRequest>,
    ) -> Result<tonic::Response<WriteSchemaResponse>, tonic::Status> {
        self.inner.ready().await.map_err(|e| {
            tonic::Status::unknown(format!("Service was not ready: {}", e.into()))
        })?;

        let codec = tonic_prost::ProstCodec::default();
        let path =
            http::uri::PathAndQuery::from_static("/authzed.api.v1.SchemaService/WriteSchema");
        let mut request = request.into_request();
        request.extensions_mut().insert(tonic::GrpcMethod::new(
            "authzed.api.v1.SchemaService",
            "WriteSchema",
        ));

        self.inner.unary(request, path, codec).await
    }
}
