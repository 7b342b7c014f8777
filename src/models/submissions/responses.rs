use super::entities::Submission;
use crate::models::PaginatedResponse;

pub type SubmissionListResponse = PaginatedResponse<Submission>;
