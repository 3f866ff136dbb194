//! Route definitions and their compiled form.
//!
//! A [`RouteDefinition`] is what an application registers. Baking turns it
//! into a [`CompiledRoute`], which owns the compiled matcher and runs the
//! per-request gates in order:
//!
//! 1. method allow-list (miss is a soft does-not-match)
//! 2. path tokenization (miss is a soft does-not-match)
//! 3. param resolution
//! 4. body resolution, only when a body type is declared
//!
//! Failures in steps 3 and 4 are terminal for the whole dispatch.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use http::Request;

use orbit_core::{BakeError, RouteError};
use orbit_extract::{BodySpec, FromBody, FromParam, ParamSpec, ResolvedBody, ResolvedParams};
use orbit_router::{CompiledTemplate, MethodFilter};

use crate::handler::{BoxFuture, Handler};
use crate::response::HttpResponse;

/// A route as registered, before baking.
///
/// # Example
///
/// ```rust
/// use bytes::Bytes;
/// use http::{Request, StatusCode};
/// use orbit_extract::{BasicInt, Json, ResolvedBody, ResolvedParams};
/// use orbit_server::RouteDefinition;
///
/// async fn rsvp(_: Request<Bytes>, _: ResolvedParams, _: ResolvedBody) -> StatusCode {
///     StatusCode::CREATED
/// }
///
/// let route = RouteDefinition::new("/events/{event}/rsvp", rsvp)
///     .methods(["POST"])
///     .param::<BasicInt>("event")
///     .body::<Json<serde_json::Value>>();
///
/// assert_eq!(route.template(), "/events/{event}/rsvp");
/// ```
#[derive(Clone)]
pub struct RouteDefinition {
    template: String,
    methods: MethodFilter,
    params: ParamSpec,
    body: Option<BodySpec>,
    handler: Arc<dyn Handler>,
}

impl RouteDefinition {
    /// Creates a route for `template` served by `handler`.
    ///
    /// With no further configuration the route accepts any method, leaves
    /// every placeholder raw, and does not decode the body.
    pub fn new(template: impl Into<String>, handler: impl Handler) -> Self {
        Self {
            template: template.into(),
            methods: MethodFilter::any(),
            params: ParamSpec::new(),
            body: None,
            handler: Arc::new(handler),
        }
    }

    /// Replaces the method allow-list. An empty list allows any method.
    #[must_use]
    pub fn methods(mut self, methods: impl Into<MethodFilter>) -> Self {
        self.methods = methods.into();
        self
    }

    /// Adds one method to the allow-list.
    #[must_use]
    pub fn method(mut self, method: &str) -> Self {
        self.methods = self.methods.method(method);
        self
    }

    /// Replaces the param spec.
    #[must_use]
    pub fn params(mut self, params: ParamSpec) -> Self {
        self.params = params;
        self
    }

    /// Declares that placeholder `name` resolves to `T`.
    #[must_use]
    pub fn param<T: FromParam>(mut self, name: impl Into<String>) -> Self {
        self.params = self.params.param::<T>(name);
        self
    }

    /// Declares that the body resolves to `T`.
    #[must_use]
    pub fn body<T: FromBody>(self) -> Self {
        self.body_spec(BodySpec::of::<T>())
    }

    /// Declares a body spec.
    #[must_use]
    pub fn body_spec(mut self, body: BodySpec) -> Self {
        self.body = Some(body);
        self
    }

    /// Returns the route template.
    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Returns the method allow-list.
    #[must_use]
    pub fn allowed_methods(&self) -> &MethodFilter {
        &self.methods
    }

    /// Compiles the template and checks the param spec against it.
    pub(crate) fn compile(&self) -> Result<CompiledRoute, BakeError> {
        let matcher =
            CompiledTemplate::compile(self.template.as_str()).map_err(|source| {
                BakeError::Template {
                    template: self.template.clone(),
                    source,
                }
            })?;

        if let Some(param) = self.params.names().find(|name| !matcher.has_param(name)) {
            return Err(BakeError::UnknownParam {
                template: self.template.clone(),
                param: param.to_string(),
            });
        }

        Ok(CompiledRoute {
            definition: self.clone(),
            matcher,
        })
    }
}

impl fmt::Debug for RouteDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteDefinition")
            .field("template", &self.template)
            .field("methods", &self.methods)
            .field("params", &self.params)
            .field("body", &self.body)
            .finish_non_exhaustive()
    }
}

/// Typed values produced for a request that passed every gate.
#[derive(Debug, Default)]
pub struct Resolution {
    /// Resolved placeholder values.
    pub params: ResolvedParams,
    /// Resolved body, or [`ResolvedBody::Absent`].
    pub body: ResolvedBody,
}

/// A baked route. Immutable and shared by every request.
pub struct CompiledRoute {
    definition: RouteDefinition,
    matcher: CompiledTemplate,
}

impl CompiledRoute {
    /// Returns the route template.
    #[must_use]
    pub fn template(&self) -> &str {
        &self.definition.template
    }

    /// Returns the compiled matcher.
    #[must_use]
    pub fn matcher(&self) -> &CompiledTemplate {
        &self.matcher
    }

    /// Returns the method allow-list.
    #[must_use]
    pub fn allowed_methods(&self) -> &MethodFilter {
        &self.definition.methods
    }

    /// Runs the method, path, param and body gates for `request`.
    ///
    /// The request body is only read through a separate cursor, so the
    /// handler still sees it in full.
    ///
    /// # Errors
    ///
    /// [`RouteError::DoesNotMatch`] if the method or path is not accepted;
    /// any other variant if resolution failed.
    pub fn resolve(&self, request: &Request<Bytes>) -> Result<Resolution, RouteError> {
        let method = request.method();
        if !self.definition.methods.allows_method(method) {
            return Err(RouteError::does_not_match(format!(
                "method {method} not allowed"
            )));
        }

        let raw = self.matcher.tokenize(request.uri().path())?;
        let params = self.definition.params.resolve(raw)?;

        let body = match &self.definition.body {
            Some(spec) => spec.resolve(request.body())?,
            None => ResolvedBody::Absent,
        };

        Ok(Resolution { params, body })
    }

    /// Hands a resolved request to the route's handler.
    pub fn call(&self, request: Request<Bytes>, resolution: Resolution) -> BoxFuture<'static, HttpResponse> {
        self.definition
            .handler
            .call(request, resolution.params, resolution.body)
    }
}

impl fmt::Debug for CompiledRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledRoute")
            .field("template", &self.definition.template)
            .field("pattern", &self.matcher.pattern())
            .field("methods", &self.definition.methods)
            .finish_non_exhaustive()
    }
}
