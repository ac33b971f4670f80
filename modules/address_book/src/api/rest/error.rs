use problem_details::{ErrDef, ProblemResponse, ValidationError};

use crate::domain::error::DomainError;

pub const VALIDATION: ErrDef = ErrDef {
    status: 400,
    title: "Validation error",
    code: "CONTACTS_VALIDATION",
};

pub const NOT_FOUND: ErrDef = ErrDef {
    status: 404,
    title: "Contact not found",
    code: "CONTACTS_NOT_FOUND",
};

pub const INTERNAL_DB: ErrDef = ErrDef {
    status: 500,
    title: "Internal error",
    code: "INTERNAL_DB",
};

pub const UNAUTHENTICATED: ErrDef = ErrDef {
    status: 401,
    title: "Unauthorized",
    code: "UNAUTHENTICATED",
};

pub const RATE_LIMITED: ErrDef = ErrDef {
    status: 429,
    title: "Too many requests",
    code: "RATE_LIMITED",
};

/// Map a domain error to an RFC 9457 response. Database details are logged, never exposed.
pub fn map_domain_error(e: &DomainError, instance: &str) -> ProblemResponse {
    match e {
        DomainError::ContactNotFound { id } => {
            NOT_FOUND.to_response(format!("Contact with id {id} was not found"), instance)
        }
        DomainError::Validation { field, message } => {
            let mut problem =
                VALIDATION.to_problem(format!("Invalid '{field}': {message}"), instance);
            problem = problem.with_errors(vec![ValidationError {
                detail: message.clone(),
                pointer: format!("/{field}"),
            }]);
            ProblemResponse(problem)
        }
        DomainError::Database { .. } => {
            tracing::error!(error = ?e, "Database error occurred");
            INTERNAL_DB.to_response("An internal database error occurred", instance)
        }
    }
}
