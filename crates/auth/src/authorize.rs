//! Ordered, first-match-wins authorization rule table.
//!
//! - No IO
//! - No panics
//! - Pure policy check over (method, path, optional authentication context)

use core::str::FromStr;

use serde::Serialize;

use crate::{AuthenticationContext, Role};

// ─────────────────────────────────────────────────────────────────────────────
// Request matching
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
        }
    }
}

impl FromStr for HttpMethod {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "PATCH" => Ok(HttpMethod::Patch),
            "DELETE" => Ok(HttpMethod::Delete),
            "HEAD" => Ok(HttpMethod::Head),
            "OPTIONS" => Ok(HttpMethod::Options),
            _ => Err(()),
        }
    }
}

impl core::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    /// `{name}`: exactly one segment, captured.
    Param(String),
    /// `*`: exactly one segment.
    Any,
    /// `**`: zero or more segments.
    Rest,
}

/// Path template such as `/employees/my-salary/{empId}` or `/salaries/**`.
///
/// Matching is segment-wise and case-sensitive; empty segments (leading,
/// trailing or doubled slashes) are ignored on both sides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    pub fn parse(pattern: &str) -> Self {
        let segments = pattern
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| match s {
                "**" => Segment::Rest,
                "*" => Segment::Any,
                _ => match s.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                    Some(name) if !name.is_empty() => Segment::Param(name.to_string()),
                    _ => Segment::Literal(s.to_string()),
                },
            })
            .collect();

        Self {
            raw: pattern.to_string(),
            segments,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Match `path`, returning captured `{name}` values on success.
    pub fn matches(&self, path: &str) -> Option<PathParams> {
        let path: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let mut params = Vec::new();
        if match_segments(&self.segments, &path, &mut params) {
            Some(PathParams(params))
        } else {
            None
        }
    }
}

fn match_segments(pattern: &[Segment], path: &[&str], params: &mut Vec<(String, String)>) -> bool {
    let Some((head, rest)) = pattern.split_first() else {
        return path.is_empty();
    };

    if *head == Segment::Rest {
        for skip in 0..=path.len() {
            let mark = params.len();
            if match_segments(rest, &path[skip..], params) {
                return true;
            }
            params.truncate(mark);
        }
        return false;
    }

    let Some((first, tail)) = path.split_first() else {
        return false;
    };

    let mark = params.len();
    let head_matches = match head {
        Segment::Literal(literal) => literal == first,
        Segment::Param(name) => {
            params.push((name.clone(), (*first).to_string()));
            true
        }
        Segment::Any | Segment::Rest => true,
    };

    if head_matches && match_segments(rest, tail, params) {
        return true;
    }
    params.truncate(mark);
    false
}

/// Values captured from `{name}` segments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams(Vec<(String, String)>);

impl PathParams {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, v)| v.as_str())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Rules
// ─────────────────────────────────────────────────────────────────────────────

/// What a matching rule demands of the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    /// No authentication required.
    Public,
    /// Any authenticated principal.
    Authenticated,
    /// An authenticated principal holding at least one of the roles.
    AnyRole(Vec<Role>),
}

/// Same-identity predicate layered on a rule: the `{param}` path value must
/// equal the caller's identifier, unless the caller holds an exempt role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelfAccess {
    pub param: String,
    pub exempt: Vec<Role>,
}

/// One row of the rule table: `(method or ANY, path pattern) -> access`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationRule {
    method: Option<HttpMethod>,
    pattern: PathPattern,
    access: Access,
    self_access: Option<SelfAccess>,
}

impl AuthorizationRule {
    /// Rule for `method` (`None` = any method). Defaults to [`Access::Authenticated`].
    pub fn new(method: Option<HttpMethod>, pattern: &str) -> Self {
        Self {
            method,
            pattern: PathPattern::parse(pattern),
            access: Access::Authenticated,
            self_access: None,
        }
    }

    pub fn any(pattern: &str) -> Self {
        Self::new(None, pattern)
    }

    pub fn get(pattern: &str) -> Self {
        Self::new(Some(HttpMethod::Get), pattern)
    }

    pub fn post(pattern: &str) -> Self {
        Self::new(Some(HttpMethod::Post), pattern)
    }

    pub fn put(pattern: &str) -> Self {
        Self::new(Some(HttpMethod::Put), pattern)
    }

    pub fn delete(pattern: &str) -> Self {
        Self::new(Some(HttpMethod::Delete), pattern)
    }

    pub fn permit_all(mut self) -> Self {
        self.access = Access::Public;
        self
    }

    pub fn authenticated(mut self) -> Self {
        self.access = Access::Authenticated;
        self
    }

    pub fn has_role(self, role: Role) -> Self {
        self.has_any_role([role])
    }

    pub fn has_any_role(mut self, roles: impl IntoIterator<Item = Role>) -> Self {
        self.access = Access::AnyRole(roles.into_iter().collect());
        self
    }

    /// Require the `{param}` path value to equal the caller's own identifier.
    pub fn self_only(mut self, param: &str) -> Self {
        self.self_access = Some(SelfAccess {
            param: param.to_string(),
            exempt: Vec::new(),
        });
        self
    }

    /// Roles that bypass the [`Self::self_only`] predicate.
    pub fn self_exempt(mut self, roles: impl IntoIterator<Item = Role>) -> Self {
        if let Some(self_access) = self.self_access.as_mut() {
            self_access.exempt.extend(roles);
        }
        self
    }

    fn matches(&self, method: Option<HttpMethod>, path: &str) -> Option<PathParams> {
        if let Some(required) = self.method {
            if method != Some(required) {
                return None;
            }
        }
        self.pattern.matches(path)
    }

    fn decide(&self, params: &PathParams, context: Option<&AuthenticationContext>) -> Decision {
        if self.access == Access::Public {
            return Decision::Allow;
        }

        let Some(ctx) = context else {
            return Decision::Deny(DenyReason::Unauthenticated);
        };

        if let Access::AnyRole(roles) = &self.access {
            if !ctx.has_any_role(roles) {
                return Decision::Deny(DenyReason::Forbidden);
            }
        }

        if let Some(self_access) = &self.self_access {
            if !ctx.has_any_role(&self_access.exempt)
                && params.get(&self_access.param) != Some(ctx.identifier())
            {
                return Decision::Deny(DenyReason::Forbidden);
            }
        }

        Decision::Allow
    }
}

impl core::fmt::Display for AuthorizationRule {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.method {
            Some(method) => write!(f, "{} {}", method, self.pattern.as_str()),
            None => write!(f, "ANY {}", self.pattern.as_str()),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Decisions
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
    /// No authentication context, but the rule requires one.
    Unauthenticated,
    /// Authenticated, but the role or self-access check failed.
    Forbidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

/// Audit view of one decision: which rule decided and how.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorizationExplanation {
    pub method: String,
    pub path: String,
    /// Position of the deciding rule in the table.
    pub rule_index: usize,
    /// Deciding rule rendered as `METHOD pattern`.
    pub rule: String,
    pub granted: bool,
    pub denial: Option<DenyReason>,
    pub principal: Option<String>,
    pub roles: Vec<String>,
}

/// Fixed, ordered rule table. Built once at startup and shared read-only.
///
/// A final `ANY /**` rule requiring authentication is always present, so
/// every request is decided by some rule.
#[derive(Debug, Clone)]
pub struct AuthorizationPolicy {
    rules: Vec<AuthorizationRule>,
}

impl AuthorizationPolicy {
    pub fn new(rules: impl IntoIterator<Item = AuthorizationRule>) -> Self {
        let mut rules: Vec<AuthorizationRule> = rules.into_iter().collect();
        rules.push(AuthorizationRule::any("/**").authenticated());
        Self { rules }
    }

    pub fn rules(&self) -> &[AuthorizationRule] {
        &self.rules
    }

    /// Decide a request. First rule whose method and pattern match wins.
    pub fn authorize(
        &self,
        method: &str,
        path: &str,
        context: Option<&AuthenticationContext>,
    ) -> Decision {
        let (_, decision) = self.evaluate(method, path, context);
        decision
    }

    /// Like [`Self::authorize`], with the deciding rule spelled out.
    pub fn explain(
        &self,
        method: &str,
        path: &str,
        context: Option<&AuthenticationContext>,
    ) -> AuthorizationExplanation {
        let (index, decision) = self.evaluate(method, path, context);
        AuthorizationExplanation {
            method: method.to_string(),
            path: path.to_string(),
            rule_index: index,
            rule: self.rules[index].to_string(),
            granted: decision == Decision::Allow,
            denial: match decision {
                Decision::Allow => None,
                Decision::Deny(reason) => Some(reason),
            },
            principal: context.map(|ctx| ctx.identifier().to_string()),
            roles: context
                .map(|ctx| ctx.roles().iter().map(|r| r.as_str().to_string()).collect())
                .unwrap_or_default(),
        }
    }

    fn evaluate(
        &self,
        method: &str,
        path: &str,
        context: Option<&AuthenticationContext>,
    ) -> (usize, Decision) {
        let method = method.parse::<HttpMethod>().ok();
        for (index, rule) in self.rules.iter().enumerate() {
            if let Some(params) = rule.matches(method, path) {
                return (index, rule.decide(&params, context));
            }
        }
        // The trailing catch-all always matches; keep a closed fallback anyway.
        let last = self.rules.len().saturating_sub(1);
        match context {
            Some(_) => (last, Decision::Allow),
            None => (last, Decision::Deny(DenyReason::Unauthenticated)),
        }
    }
}

#[cfg(test)]
mod tests {
    use hrms_core::{AdminRecord, EmployeeRecord};

    use super::*;
    use crate::Principal;

    fn admin(name: &str) -> AuthenticationContext {
        AuthenticationContext::new(Principal::Admin(AdminRecord::new(1, name, "h")))
    }

    fn employee(emp_id: &str) -> AuthenticationContext {
        AuthenticationContext::new(Principal::Employee(EmployeeRecord::new(1, emp_id, "E", "h")))
    }

    fn policy() -> AuthorizationPolicy {
        AuthorizationPolicy::new([
            AuthorizationRule::any("/auth/login").permit_all(),
            AuthorizationRule::get("/employees/byEmpId/{empId}")
                .has_any_role([Role::ADMIN, Role::EMPLOYEE])
                .self_only("empId")
                .self_exempt([Role::ADMIN]),
            AuthorizationRule::get("/employees/my-salary/{empId}")
                .has_role(Role::EMPLOYEE)
                .self_only("empId"),
            AuthorizationRule::any("/employees/**").has_role(Role::ADMIN),
        ])
    }

    #[test]
    fn pattern_literals_params_and_wildcards() {
        let p = PathPattern::parse("/employees/my-salary/{empId}");
        assert_eq!(p.matches("/employees/my-salary/E1001").unwrap().get("empId"), Some("E1001"));
        assert!(p.matches("/employees/my-salary").is_none());
        assert!(p.matches("/employees/my-salary/E1001/extra").is_none());
        assert!(p.matches("/Employees/my-salary/E1001").is_none());

        let rest = PathPattern::parse("/employees/**");
        assert!(rest.matches("/employees").is_some());
        assert!(rest.matches("/employees/").is_some());
        assert!(rest.matches("/employees/a/b/c").is_some());
        assert!(rest.matches("/employeesX").is_none());

        let one = PathPattern::parse("/a/*/c");
        assert!(one.matches("/a/b/c").is_some());
        assert!(one.matches("/a/c").is_none());

        let inner = PathPattern::parse("/a/**/{id}/edit");
        let params = inner.matches("/a/x/y/42/edit").unwrap();
        assert_eq!(params.get("id"), Some("42"));
        assert!(inner.matches("/a/42/edit").is_some());
        assert!(inner.matches("/a/edit").is_none());
    }

    #[test]
    fn public_rule_needs_no_context() {
        assert_eq!(policy().authorize("POST", "/auth/login", None), Decision::Allow);
        assert_eq!(policy().authorize("POST", "/auth/login", Some(&admin("a"))), Decision::Allow);
    }

    #[test]
    fn missing_context_is_unauthenticated() {
        assert_eq!(
            policy().authorize("GET", "/employees", None),
            Decision::Deny(DenyReason::Unauthenticated)
        );
        assert_eq!(
            policy().authorize("GET", "/anything/else", None),
            Decision::Deny(DenyReason::Unauthenticated)
        );
    }

    #[test]
    fn wrong_role_is_forbidden() {
        assert_eq!(
            policy().authorize("DELETE", "/employees/E1001", Some(&employee("E1001"))),
            Decision::Deny(DenyReason::Forbidden)
        );
        assert_eq!(
            policy().authorize("DELETE", "/employees/E1001", Some(&admin("root"))),
            Decision::Allow
        );
    }

    #[test]
    fn specific_rule_shadows_family_wildcard() {
        // Without the earlier rule, `/employees/**` (ADMIN) would deny this.
        assert_eq!(
            policy().authorize("GET", "/employees/my-salary/E1001", Some(&employee("E1001"))),
            Decision::Allow
        );
        // Method-specific rule does not apply to other methods.
        assert_eq!(
            policy().authorize("PUT", "/employees/my-salary/E1001", Some(&employee("E1001"))),
            Decision::Deny(DenyReason::Forbidden)
        );
    }

    #[test]
    fn self_access_requires_same_identifier() {
        assert_eq!(
            policy().authorize("GET", "/employees/my-salary/E1002", Some(&employee("E1001"))),
            Decision::Deny(DenyReason::Forbidden)
        );
        // Byte-exact comparison.
        assert_eq!(
            policy().authorize("GET", "/employees/my-salary/e1001", Some(&employee("E1001"))),
            Decision::Deny(DenyReason::Forbidden)
        );
    }

    #[test]
    fn self_access_exemption() {
        let p = policy();
        assert_eq!(p.authorize("GET", "/employees/byEmpId/E1002", Some(&admin("root"))), Decision::Allow);
        assert_eq!(
            p.authorize("GET", "/employees/byEmpId/E1001", Some(&employee("E1001"))),
            Decision::Allow
        );
        assert_eq!(
            p.authorize("GET", "/employees/byEmpId/E1002", Some(&employee("E1001"))),
            Decision::Deny(DenyReason::Forbidden)
        );
    }

    #[test]
    fn default_rule_requires_any_authentication() {
        let p = policy();
        assert_eq!(p.rules().last().unwrap().to_string(), "ANY /**");
        assert_eq!(p.authorize("GET", "/auth/me", Some(&employee("E1001"))), Decision::Allow);
        assert_eq!(
            p.authorize("GET", "/auth/me", None),
            Decision::Deny(DenyReason::Unauthenticated)
        );
    }

    #[test]
    fn unknown_method_only_matches_any_rules() {
        let p = policy();
        // `GET`-only byEmpId rule is skipped; the ADMIN family rule decides.
        assert_eq!(
            p.authorize("TRACE", "/employees/byEmpId/E1001", Some(&employee("E1001"))),
            Decision::Deny(DenyReason::Forbidden)
        );
        assert_eq!("get".parse::<HttpMethod>(), Ok(HttpMethod::Get));
    }

    #[test]
    fn explanation_names_deciding_rule() {
        let explanation = policy().explain("GET", "/employees/my-salary/E1002", Some(&employee("E1001")));

        assert_eq!(explanation.rule_index, 2);
        assert_eq!(explanation.rule, "GET /employees/my-salary/{empId}");
        assert!(!explanation.granted);
        assert_eq!(explanation.denial, Some(DenyReason::Forbidden));
        assert_eq!(explanation.principal.as_deref(), Some("E1001"));
        assert_eq!(explanation.roles, vec!["EMPLOYEE"]);
    }

    mod proptest_tests {
        use proptest::prelude::*;

        use super::*;

        proptest! {
            /// Property: a `{param}` pattern captures exactly the path segment.
            #[test]
            fn param_capture(prefix in "[a-z-]{1,12}", value in "[A-Za-z0-9_.-]{1,16}") {
                let pattern = PathPattern::parse(&format!("/{prefix}/{{id}}"));
                let params = pattern.matches(&format!("/{prefix}/{value}")).unwrap();
                prop_assert_eq!(params.get("id"), Some(value.as_str()));
            }

            /// Property: `/**` matches every path.
            #[test]
            fn catch_all_matches_everything(segments in proptest::collection::vec("[a-zA-Z0-9]{1,8}", 0..6)) {
                let path = format!("/{}", segments.join("/"));
                prop_assert!(PathPattern::parse("/**").matches(&path).is_some());
            }

            /// Property: self-only rules allow exactly the caller's own identifier.
            #[test]
            fn self_only_is_exact(caller in "E[0-9]{4}", target in "E[0-9]{4}") {
                let path = format!("/employees/my-salary/{target}");
                let decision = policy().authorize("GET", &path, Some(&employee(&caller)));
                let expected = if caller == target {
                    Decision::Allow
                } else {
                    Decision::Deny(DenyReason::Forbidden)
                };
                prop_assert_eq!(decision, expected);
            }
        }
    }

    #[test]
    fn explanation_carries_the_same_decision() {
        let policy = policy();
        let me = employee("E1001");
        let root = admin("root");

        for (method, path, ctx) in [
            ("POST", "/auth/login", None),
            ("GET", "/employees/my-salary/E1001", Some(&me)),
            ("GET", "/employees/my-salary/E1002", Some(&me)),
            ("GET", "/employees/my-salary/E1001", Some(&root)),
            ("DELETE", "/employees/E1001", None),
            ("GET", "/departments", Some(&me)),
        ] {
            let decision = policy.authorize(method, path, ctx);
            let explanation = policy.explain(method, path, ctx);

            assert_eq!(explanation.granted, decision == Decision::Allow, "{method} {path}");
            match decision {
                Decision::Allow => assert_eq!(explanation.denial, None),
                Decision::Deny(reason) => assert_eq!(explanation.denial, Some(reason)),
            }
        }
    }
}
