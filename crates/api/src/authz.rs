//! HR route authorization table.
//!
//! Order matters: the first rule whose method and pattern match decides the
//! request. Specific employee self-service rules therefore sit above the
//! administrator catch-alls for the same prefix.

use hrms_auth::{AuthorizationPolicy, AuthorizationRule as Rule, Role};

/// The rule table enforced in front of every HR route.
pub fn hrms_policy() -> AuthorizationPolicy {
    AuthorizationPolicy::new([
        // Public entry points.
        Rule::any("/auth/login").permit_all(),
        Rule::any("/auth/register").permit_all(),
        Rule::any("/error").permit_all(),
        Rule::get("/health").permit_all(),
        // Employees
        Rule::get("/employees/byEmpId/{empId}")
            .has_any_role([Role::ADMIN, Role::EMPLOYEE])
            .self_only("empId")
            .self_exempt([Role::ADMIN]),
        Rule::get("/employees/my-salary/{empId}")
            .has_role(Role::EMPLOYEE)
            .self_only("empId"),
        Rule::put("/employees/change-password/{empId}")
            .has_role(Role::EMPLOYEE)
            .self_only("empId"),
        Rule::put("/employees/my-profile/{empId}")
            .has_role(Role::EMPLOYEE)
            .self_only("empId"),
        Rule::delete("/employees/{empId}/resigned").has_role(Role::ADMIN),
        Rule::any("/employees/**").has_role(Role::ADMIN),
        // Announcements
        Rule::post("/announcements").has_role(Role::ADMIN),
        Rule::put("/announcements/**").has_role(Role::ADMIN),
        Rule::delete("/announcements/**").has_role(Role::ADMIN),
        Rule::get("/announcements/**").has_any_role([Role::ADMIN, Role::EMPLOYEE]),
        // Leave applications
        Rule::post("/leave-applications").has_role(Role::EMPLOYEE),
        Rule::get("/leave-applications/my-applications/detail/{id}").has_role(Role::EMPLOYEE),
        Rule::get("/leave-applications/my-applications/{empId}")
            .has_role(Role::EMPLOYEE)
            .self_only("empId"),
        Rule::get("/leave-applications/my-applications/**").has_role(Role::EMPLOYEE),
        Rule::delete("/leave-applications/my-applications/**").has_role(Role::EMPLOYEE),
        Rule::any("/leave-applications/**").has_role(Role::ADMIN),
        // Administrators
        Rule::any("/admins/**").has_role(Role::ADMIN),
        // Salaries
        Rule::get("/salaries/my-salaries/{empId}")
            .has_role(Role::EMPLOYEE)
            .self_only("empId"),
        Rule::get("/salaries/my-salary-detail/**").has_role(Role::EMPLOYEE),
        Rule::any("/salaries/**").has_role(Role::ADMIN),
    ])
}
