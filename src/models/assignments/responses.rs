use super::entities::Assignment;
use crate::models::PaginatedResponse;

pub type AssignmentListResponse = PaginatedResponse<Assignment>;
