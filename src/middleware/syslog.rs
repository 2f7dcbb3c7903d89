//! Marker-driven request logging.
//!
//! Every call to a marked endpoint is bracketed by two records on the
//! [`LOG_TARGET`] target:
//!
//! ```text
//! ========================================== Start ==========================================
//! URL            : http://localhost:3000/users
//! Description    : create user
//! HTTP Method    : POST
//! Class Method   : demo::UserController.create
//! IP             : 127.0.0.1
//! Request Args   : [{"name":"a"}]
//!     … handler runs …
//! =========================================== End ===========================================
//! ```
//!
//! The end banner carries a trailing line separator so consecutive requests
//! are split by a blank line in a shared log stream. It is written from a
//! drop guard: a handler that returns an error, panics, or is cancelled
//! mid-flight still gets its end banner.
//!
//! Records of concurrent requests may interleave. Each record is a single
//! `tracing` event, so a block is never torn apart, but the start and end
//! of one request are not guaranteed to be adjacent.

use std::fmt;
use std::future::Future;

use tracing::{error, info};

use crate::config::{ResolutionPolicy, SysLogConfig};
use crate::context::{InterceptedCall, JoinPoint, RequestContext};
use crate::error::Error;
use crate::registry::MarkerRegistry;

/// `tracing` target of every record the interceptor writes.
pub const LOG_TARGET: &str = "sys_log";

pub(crate) const LINE_SEPARATOR: &str = if cfg!(windows) { "\r\n" } else { "\n" };

pub(crate) const START_BANNER: &str =
    "========================================== Start ==========================================";
pub(crate) const END_BANNER: &str =
    "=========================================== End ===========================================";

/// The block written before a marked handler runs.
pub struct BeforeRecord<'a> {
    call: InterceptedCall<'a>,
    description: &'a str,
}

impl<'a> BeforeRecord<'a> {
    pub fn new(call: InterceptedCall<'a>, description: &'a str) -> Self {
        Self { call, description }
    }
}

impl fmt::Display for BeforeRecord<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let InterceptedCall { join_point, request } = self.call;
        let signature = join_point.signature();
        let args = serde_json::to_string(join_point.args()).map_err(|_| fmt::Error)?;
        let sep = LINE_SEPARATOR;

        write!(f, "{START_BANNER}{sep}")?;
        write!(f, "URL            : {}{sep}", request.url)?;
        write!(f, "Description    : {}{sep}", self.description)?;
        write!(f, "HTTP Method    : {}{sep}", request.method)?;
        write!(f, "Class Method   : {}.{}{sep}", signature.declaring_type, signature.name)?;
        write!(f, "IP             : {}{sep}", request.remote_addr)?;
        write!(f, "Request Args   : {args}")
    }
}

/// Wraps marked handler calls with the start and end records.
///
/// The interceptor keeps no per-call state. One instance serves every
/// concurrent request; the [`MarkerRegistry`] is read-only once serving.
#[derive(Debug, Default)]
pub struct SysLogInterceptor {
    registry: MarkerRegistry,
    config: SysLogConfig,
}

impl SysLogInterceptor {
    pub fn new(registry: MarkerRegistry, config: SysLogConfig) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &MarkerRegistry { &self.registry }
    pub fn config(&self) -> &SysLogConfig { &self.config }

    pub(crate) fn registry_mut(&mut self) -> &mut MarkerRegistry { &mut self.registry }
    pub(crate) fn set_config(&mut self, config: SysLogConfig) { self.config = config; }

    /// Join-point selector: `true` when the invoked overload carries a marker.
    ///
    /// Fails when the target type is unknown instead of treating the call as
    /// unmarked.
    pub fn matches(&self, jp: &JoinPoint) -> Result<bool, Error> {
        Ok(self.registry.marker_for(jp)?.is_some())
    }

    /// Before advice: resolves the description and writes the start record.
    ///
    /// Calls the selector excludes write nothing. A resolution failure is
    /// always logged; whether it is also returned depends on
    /// [`SysLogConfig::on_resolution_failure`].
    pub fn before(&self, call: InterceptedCall<'_>) -> Result<(), Error> {
        let description = match self.registry.marker_for(call.join_point) {
            Ok(Some(marker)) => marker.description(),
            Ok(None) => return Ok(()),
            Err(e) => {
                self.resolution_failed(e, call.join_point)?;
                ""
            }
        };
        info!(target: LOG_TARGET, "{}", BeforeRecord::new(call, description));
        Ok(())
    }

    /// After advice: writes the end banner and the separating blank line.
    pub fn after(&self) {
        info!(target: LOG_TARGET, "{END_BANNER}{LINE_SEPARATOR}");
    }

    /// Runs `handler` for the call described by `jp`, logging around it when
    /// the invoked overload is marked.
    ///
    /// The handler's output is returned untouched. `Err` is only produced by
    /// the interceptor itself, and in that case `handler` is never polled:
    ///
    /// - [`Error::Resolution`] under [`ResolutionPolicy::Propagate`]
    /// - [`Error::MissingRequestContext`] when a marked call has no request
    ///
    /// Unmarked calls run straight through, with or without a request.
    pub async fn around<F>(
        &self,
        request: Option<&RequestContext>,
        jp: &JoinPoint,
        handler: F,
    ) -> Result<F::Output, Error>
    where
        F: Future,
    {
        // An unresolvable type is not excluded here; `before` reports it.
        if !self.matches(jp).unwrap_or(true) {
            return Ok(handler.await);
        }

        let request = request.ok_or(Error::MissingRequestContext)?;
        self.before(InterceptedCall { join_point: jp, request })?;

        let _after = AfterGuard { interceptor: self };
        Ok(handler.await)
    }

    fn resolution_failed(&self, e: Error, jp: &JoinPoint) -> Result<(), Error> {
        error!(
            target: LOG_TARGET,
            error = %e,
            target_type = jp.target_type(),
            method = jp.method_name(),
            "description resolution failed"
        );
        match self.config.on_resolution_failure {
            ResolutionPolicy::Propagate => Err(e),
            ResolutionPolicy::LogAndContinue => Ok(()),
        }
    }
}

/// Writes the end banner when dropped, on every exit path of the handler.
struct AfterGuard<'a> {
    interceptor: &'a SysLogInterceptor,
}

impl Drop for AfterGuard<'_> {
    fn drop(&mut self) {
        self.interceptor.after();
    }
}
