//! Per-call data handed to the interceptor.
//!
//! Nothing here is global or thread-local. The host builds a [`JoinPoint`]
//! and a [`RequestContext`] for every dispatched call and passes both to
//! [`SysLogInterceptor`](crate::middleware::SysLogInterceptor) explicitly.
//! Both are dropped once the after record is written.

use serde_json::Value;

/// Identity of the invoked method: where it is declared and what it is called.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Signature {
    pub declaring_type: String,
    pub name: String,
}

/// A method call eligible for interception.
#[derive(Clone, Debug, PartialEq)]
pub struct JoinPoint {
    target_type: String,
    signature: Signature,
    args: Vec<Value>,
}

impl JoinPoint {
    /// A call of `method` on an instance of `target_type`, declared on the
    /// target type itself.
    pub fn new(target_type: impl Into<String>, method: impl Into<String>, args: Vec<Value>) -> Self {
        let target_type = target_type.into();
        let signature = Signature { declaring_type: target_type.clone(), name: method.into() };
        Self { target_type, signature, args }
    }

    /// Overrides the declaring type, for methods inherited from a base type.
    pub fn declared_in(mut self, declaring_type: impl Into<String>) -> Self {
        self.signature.declaring_type = declaring_type.into();
        self
    }

    /// Runtime type of the handler instance.
    pub fn target_type(&self) -> &str { &self.target_type }
    pub fn signature(&self) -> &Signature { &self.signature }
    pub fn method_name(&self) -> &str { &self.signature.name }
    pub fn args(&self) -> &[Value] { &self.args }
}

/// The fields of the current request the before record needs.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RequestContext {
    pub url: String,
    pub method: String,
    pub remote_addr: String,
}

/// A join point together with the request that triggered it.
#[derive(Clone, Copy, Debug)]
pub struct InterceptedCall<'a> {
    pub join_point: &'a JoinPoint,
    pub request: &'a RequestContext,
}
