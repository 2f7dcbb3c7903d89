//! Marker registration table.
//!
//! Handler types and their methods are declared once at startup. Every
//! declared method is identified by `(type, name, arity)`, so an overload set
//! such as `find(page)` / `find(page, size)` is two distinct entries and a
//! lookup by name plus argument count hits at most one of them.

use std::collections::HashMap;

use serde_json::Value;

use crate::context::JoinPoint;
use crate::error::Error;
use crate::marker::LogMarker;

/// A handler method as declared to the router.
///
/// ```rust
/// use marklog::{Endpoint, LogMarker};
///
/// let create = Endpoint::new("demo::UserController", "create", 1)
///     .marked(LogMarker::new("create user"));
/// assert!(create.marker().is_some());
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Endpoint {
    type_name: String,
    method: String,
    arity: usize,
    declaring_type: Option<String>,
    marker: Option<LogMarker>,
}

impl Endpoint {
    pub fn new(type_name: impl Into<String>, method: impl Into<String>, arity: usize) -> Self {
        Self {
            type_name: type_name.into(),
            method: method.into(),
            arity,
            declaring_type: None,
            marker: None,
        }
    }

    /// Attaches the log marker. Unmarked endpoints are never intercepted.
    pub fn marked(mut self, marker: LogMarker) -> Self {
        self.marker = Some(marker);
        self
    }

    /// Records that the method is inherited from `declaring_type`.
    pub fn declared_in(mut self, declaring_type: impl Into<String>) -> Self {
        self.declaring_type = Some(declaring_type.into());
        self
    }

    pub fn type_name(&self) -> &str { &self.type_name }
    pub fn method(&self) -> &str { &self.method }
    pub fn arity(&self) -> usize { self.arity }
    pub fn marker(&self) -> Option<&LogMarker> { self.marker.as_ref() }

    /// Builds the join point for one invocation of this endpoint.
    pub fn join_point(&self, args: Vec<Value>) -> JoinPoint {
        let jp = JoinPoint::new(self.type_name.clone(), self.method.clone(), args);
        match &self.declaring_type {
            Some(declaring) => jp.declared_in(declaring.clone()),
            None => jp,
        }
    }

    fn same_overload(&self, name: &str, arity: usize) -> bool {
        self.method == name && self.arity == arity
    }
}

/// Declared handler types and their methods, in declaration order.
#[derive(Debug, Default)]
pub struct MarkerRegistry {
    types: HashMap<String, Vec<Endpoint>>,
}

impl MarkerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `endpoint` to its type's method list.
    ///
    /// Declaring an identical endpoint twice is accepted and changes nothing,
    /// so one handler can be mounted on several routes.
    pub fn declare(&mut self, endpoint: Endpoint) -> Result<(), Error> {
        let methods = self.types.entry(endpoint.type_name.clone()).or_default();

        match methods.iter().find(|m| m.same_overload(&endpoint.method, endpoint.arity)) {
            Some(existing) if *existing == endpoint => Ok(()),
            Some(_) => Err(Error::DuplicateOverload {
                type_name: endpoint.type_name,
                method: endpoint.method,
                arity: endpoint.arity,
            }),
            None => {
                methods.push(endpoint);
                Ok(())
            }
        }
    }

    pub fn contains_type(&self, type_name: &str) -> bool {
        self.types.contains_key(type_name)
    }

    /// First declared method of `type_name` named `method` taking `arg_count`
    /// parameters.
    ///
    /// Fails with [`Error::Resolution`] when the type itself was never
    /// declared; a known type without a matching method yields `Ok(None)`.
    pub fn find(
        &self,
        type_name: &str,
        method: &str,
        arg_count: usize,
    ) -> Result<Option<&Endpoint>, Error> {
        let methods = self.types.get(type_name).ok_or_else(|| Error::Resolution {
            type_name: type_name.to_owned(),
        })?;
        Ok(methods.iter().find(|m| m.same_overload(method, arg_count)))
    }

    /// Marker on the overload `jp` actually invokes, if any.
    pub fn marker_for(&self, jp: &JoinPoint) -> Result<Option<&LogMarker>, Error> {
        let found = self.find(jp.target_type(), jp.method_name(), jp.args().len())?;
        Ok(found.and_then(Endpoint::marker))
    }

    /// Description text of the marker on the invoked overload.
    ///
    /// An unmatched overload or an unmarked method resolves to `""`.
    pub fn resolve_description(&self, jp: &JoinPoint) -> Result<String, Error> {
        Ok(self
            .marker_for(jp)?
            .map(|marker| marker.description().to_owned())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const USERS: &str = "demo::UserController";

    fn users() -> MarkerRegistry {
        let mut registry = MarkerRegistry::new();
        registry.declare(Endpoint::new(USERS, "find", 1)).unwrap();
        registry
            .declare(Endpoint::new(USERS, "find", 2).marked(LogMarker::new("paged find")))
            .unwrap();
        registry
            .declare(Endpoint::new(USERS, "create", 1).marked(LogMarker::new("create user")))
            .unwrap();
        registry
    }

    #[test]
    fn resolves_by_argument_count() {
        let registry = users();

        let single = JoinPoint::new(USERS, "find", vec![json!(5)]);
        let paged = JoinPoint::new(USERS, "find", vec![json!(5), json!(10)]);

        assert_eq!(registry.resolve_description(&single).unwrap(), "");
        assert_eq!(registry.resolve_description(&paged).unwrap(), "paged find");
    }

    #[test]
    fn no_matching_overload_is_empty() {
        let registry = users();
        let jp = JoinPoint::new(USERS, "find", vec![json!(1), json!(2), json!(3)]);
        assert_eq!(registry.resolve_description(&jp).unwrap(), "");

        let jp = JoinPoint::new(USERS, "delete", vec![json!(1)]);
        assert_eq!(registry.resolve_description(&jp).unwrap(), "");
    }

    #[test]
    fn unknown_type_is_a_resolution_failure() {
        let registry = users();
        let jp = JoinPoint::new("demo::Detached", "find", vec![json!(5)]);

        match registry.resolve_description(&jp) {
            Err(Error::Resolution { type_name }) => assert_eq!(type_name, "demo::Detached"),
            other => panic!("expected resolution failure, got {other:?}"),
        }
    }

    #[test]
    fn empty_marker_description() {
        let mut registry = MarkerRegistry::new();
        registry
            .declare(Endpoint::new(USERS, "list", 0).marked(LogMarker::default()))
            .unwrap();

        let jp = JoinPoint::new(USERS, "list", vec![]);
        assert!(registry.marker_for(&jp).unwrap().is_some());
        assert_eq!(registry.resolve_description(&jp).unwrap(), "");
    }

    #[test]
    fn redeclaring_identical_endpoint_is_accepted() {
        let mut registry = users();
        let create = Endpoint::new(USERS, "create", 1).marked(LogMarker::new("create user"));
        assert!(registry.declare(create).is_ok());
        assert_eq!(registry.types[USERS].len(), 3);
    }

    #[test]
    fn conflicting_overload_is_rejected() {
        let mut registry = users();
        let err = registry
            .declare(Endpoint::new(USERS, "find", 2).marked(LogMarker::new("other")))
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateOverload { arity: 2, .. }));

        let err = registry
            .declare(
                Endpoint::new(USERS, "find", 1).declared_in("demo::BaseController"),
            )
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateOverload { arity: 1, .. }));
    }

    #[test]
    fn endpoint_join_point_keeps_declaring_type() {
        let endpoint = Endpoint::new(USERS, "ping", 0).declared_in("demo::BaseController");
        let jp = endpoint.join_point(vec![]);
        assert_eq!(jp.target_type(), USERS);
        assert_eq!(jp.signature().declaring_type, "demo::BaseController");
    }
}
