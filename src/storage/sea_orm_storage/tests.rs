use super::SeaOrmStorage;
use crate::models::{
    assignments::requests::{AssignmentListQuery, CreateAssignmentRequest, UpdateAssignmentRequest},
    courses::{
        entities::{CourseRole, CourseStatus},
        requests::{CourseListQuery, CourseMemberListQuery, CreateCourseRequest},
    },
    submissions::{
        entities::SubmissionStatus,
        requests::{NewSubmission, SubmissionListQuery},
    },
    users::{
        entities::{User, UserRole, UserStatus},
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
    },
};
use crate::storage::Storage;

async fn memory_storage() -> SeaOrmStorage {
    SeaOrmStorage::connect("sqlite::memory:", 1, 5)
        .await
        .expect("in-memory storage")
}

async fn seed_user(storage: &SeaOrmStorage, username: &str, role: UserRole) -> User {
    storage
        .create_user(CreateUserRequest {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password: "hashed".to_string(),
            role,
            display_name: Some(format!("{username} display")),
            avatar_url: None,
        })
        .await
        .expect("create user")
}

fn course_request(title: &str) -> CreateCourseRequest {
    CreateCourseRequest {
        title: title.to_string(),
        description: Some("desc".to_string()),
        owner_id: None,
    }
}

fn assignment_request(title: &str) -> CreateAssignmentRequest {
    CreateAssignmentRequest {
        title: title.to_string(),
        description: None,
        max_score: None,
        due_at: None,
        allow_late: None,
        allow_resubmission: None,
    }
}

fn new_submission(assignment_id: i64, author_id: i64) -> NewSubmission {
    NewSubmission {
        assignment_id,
        author_id,
        content: "answer".to_string(),
        is_late: false,
        allow_resubmission: true,
    }
}

#[tokio::test]
async fn test_user_uniqueness_and_lookup() {
    let storage = memory_storage().await;
    let alice = seed_user(&storage, "alice", UserRole::Student).await;
    assert!(!alice.email_verified);
    assert_eq!(alice.status, UserStatus::Active);

    let duplicate = storage
        .create_user(CreateUserRequest {
            username: "alice".to_string(),
            email: "other@example.com".to_string(),
            password: "hashed".to_string(),
            role: UserRole::Student,
            display_name: None,
            avatar_url: None,
        })
        .await
        .unwrap_err();
    assert!(duplicate.is_conflict());

    let by_email = storage
        .get_user_by_username_or_email("alice@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_email.id, alice.id);
    assert_eq!(storage.count_users().await.unwrap(), 1);
}

#[tokio::test]
async fn test_user_status_and_search() {
    let storage = memory_storage().await;
    let alice = seed_user(&storage, "alice", UserRole::Student).await;
    seed_user(&storage, "bobby", UserRole::Teacher).await;
    seed_user(&storage, "under_score", UserRole::Student).await;

    let disabled = storage
        .set_user_status(alice.id, UserStatus::Disabled)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(disabled.status, UserStatus::Disabled);
    assert!(
        storage
            .set_user_status(9999, UserStatus::Disabled)
            .await
            .unwrap()
            .is_none()
    );

    let teachers = storage
        .list_users_with_pagination(UserListQuery {
            role: Some(UserRole::Teacher),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(teachers.pagination.total, 1);

    // `_` 按字面量匹配
    let literal = storage
        .list_users_with_pagination(UserListQuery {
            search: Some("_".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(literal.items.len(), 1);
    assert_eq!(literal.items[0].username, "under_score");

    assert!(storage.mark_email_verified(alice.id).await.unwrap());
    let alice = storage.get_user_by_id(alice.id).await.unwrap().unwrap();
    assert!(alice.email_verified);
}

#[tokio::test]
async fn test_course_creation_enrolls_owner() {
    let storage = memory_storage().await;
    let teacher = seed_user(&storage, "teacher1", UserRole::Teacher).await;

    let course = storage
        .create_course(teacher.id, course_request("Compilers"))
        .await
        .unwrap();
    assert_eq!(course.status, CourseStatus::Active);
    let code = course.invite_code.clone().unwrap();
    assert_eq!(code.len(), 8);

    let member = storage
        .get_course_member(course.id, teacher.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(member.role, CourseRole::Instructor);

    let by_code = storage.get_course_by_code(&code).await.unwrap().unwrap();
    assert_eq!(by_code.id, course.id);
}

#[tokio::test]
async fn test_course_creation_rolls_back_on_missing_owner() {
    let storage = memory_storage().await;
    let err = storage
        .create_course(4242, course_request("Ghost"))
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E005");

    let all = storage
        .list_courses_with_pagination(CourseListQuery {
            include_archived: true,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(all.pagination.total, 0);
}

#[tokio::test]
async fn test_course_listing_filters() {
    let storage = memory_storage().await;
    let teacher = seed_user(&storage, "teacher1", UserRole::Teacher).await;
    let student = seed_user(&storage, "student1", UserRole::Student).await;

    let algebra = storage
        .create_course(teacher.id, course_request("Algebra"))
        .await
        .unwrap();
    let biology = storage
        .create_course(teacher.id, course_request("Biology"))
        .await
        .unwrap();
    storage
        .add_course_member(algebra.id, student.id, CourseRole::Student)
        .await
        .unwrap();
    storage.set_course_archived(biology.id, true).await.unwrap();

    let mine = storage
        .list_courses_with_pagination(CourseListQuery {
            member_id: Some(student.id),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(mine.items.len(), 1);
    assert_eq!(mine.items[0].id, algebra.id);

    let active = storage
        .list_courses_with_pagination(CourseListQuery {
            owner_id: Some(teacher.id),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(active.pagination.total, 1);

    let with_archived = storage
        .list_courses_with_pagination(CourseListQuery {
            owner_id: Some(teacher.id),
            include_archived: true,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(with_archived.pagination.total, 2);
}

#[tokio::test]
async fn test_duplicate_enrollment_conflicts() {
    let storage = memory_storage().await;
    let teacher = seed_user(&storage, "teacher1", UserRole::Teacher).await;
    let student = seed_user(&storage, "student1", UserRole::Student).await;
    let course = storage
        .create_course(teacher.id, course_request("Physics"))
        .await
        .unwrap();

    storage
        .add_course_member(course.id, student.id, CourseRole::Student)
        .await
        .unwrap();
    let err = storage
        .add_course_member(course.id, student.id, CourseRole::Student)
        .await
        .unwrap_err();
    assert!(err.is_conflict());

    let updated = storage
        .update_course_member_role(course.id, student.id, CourseRole::Assistant)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.role, CourseRole::Assistant);

    let members = storage
        .list_course_members_with_pagination(course.id, CourseMemberListQuery::default())
        .await
        .unwrap();
    assert_eq!(members.pagination.total, 2);
    assert_eq!(members.items[0].username, "teacher1");

    assert!(storage.remove_course_member(course.id, student.id).await.unwrap());
    assert!(!storage.remove_course_member(course.id, student.id).await.unwrap());
}

#[tokio::test]
async fn test_assignment_crud_and_defaults() {
    let storage = memory_storage().await;
    let teacher = seed_user(&storage, "teacher1", UserRole::Teacher).await;
    let course = storage
        .create_course(teacher.id, course_request("Chemistry"))
        .await
        .unwrap();

    let assignment = storage
        .create_assignment(course.id, teacher.id, assignment_request("Lab 1"))
        .await
        .unwrap();
    assert_eq!(assignment.max_score, 100.0);
    assert!(!assignment.allow_late);
    assert!(assignment.allow_resubmission);
    assert!(assignment.due_at.is_none());

    let updated = storage
        .update_assignment(
            assignment.id,
            UpdateAssignmentRequest {
                max_score: Some(20.0),
                allow_late: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.max_score, 20.0);
    assert!(updated.allow_late);
    assert_eq!(updated.title, "Lab 1");

    let listed = storage
        .list_assignments_with_pagination(course.id, AssignmentListQuery::default())
        .await
        .unwrap();
    assert_eq!(listed.pagination.total, 1);

    assert!(storage.delete_assignment(assignment.id).await.unwrap());
    assert!(
        storage
            .get_assignment_by_id(assignment.id)
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_assignment_with_submissions_is_not_deleted() {
    let storage = memory_storage().await;
    let teacher = seed_user(&storage, "teacher1", UserRole::Teacher).await;
    let student = seed_user(&storage, "student1", UserRole::Student).await;
    let course = storage
        .create_course(teacher.id, course_request("Biology"))
        .await
        .unwrap();
    let assignment = storage
        .create_assignment(course.id, teacher.id, assignment_request("Cells"))
        .await
        .unwrap();
    let submission = storage
        .create_submission(new_submission(assignment.id, student.id))
        .await
        .unwrap();

    let err = storage.delete_assignment(assignment.id).await.unwrap_err();
    assert!(err.is_conflict());
    assert!(
        storage
            .get_assignment_by_id(assignment.id)
            .await
            .unwrap()
            .is_some()
    );
    assert!(
        storage
            .get_submission_by_id(submission.id)
            .await
            .unwrap()
            .is_some()
    );

    // 撤回后可以删除
    assert!(storage.delete_submission(submission.id).await.unwrap());
    assert!(storage.delete_assignment(assignment.id).await.unwrap());
    assert!(!storage.delete_assignment(assignment.id).await.unwrap());
}

#[tokio::test]
async fn test_email_change_resets_verification() {
    let storage = memory_storage().await;
    let user = seed_user(&storage, "student1", UserRole::Student).await;
    assert!(storage.mark_email_verified(user.id).await.unwrap());

    // 邮箱不变时保留验证状态
    let same = storage
        .update_user(
            user.id,
            UpdateUserRequest {
                email: Some(user.email.clone()),
                display_name: Some("Renamed".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert!(same.email_verified);

    let changed = storage
        .update_user(
            user.id,
            UpdateUserRequest {
                email: Some("new.address@example.com".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(changed.email, "new.address@example.com");
    assert!(!changed.email_verified);
}

#[tokio::test]
async fn test_submission_attempts_increment() {
    let storage = memory_storage().await;
    let teacher = seed_user(&storage, "teacher1", UserRole::Teacher).await;
    let student = seed_user(&storage, "student1", UserRole::Student).await;
    let course = storage
        .create_course(teacher.id, course_request("History"))
        .await
        .unwrap();
    let assignment = storage
        .create_assignment(course.id, teacher.id, assignment_request("Essay"))
        .await
        .unwrap();

    let first = storage
        .create_submission(new_submission(assignment.id, student.id))
        .await
        .unwrap();
    let second = storage
        .create_submission(new_submission(assignment.id, student.id))
        .await
        .unwrap();
    assert_eq!(first.attempt, 1);
    assert_eq!(second.attempt, 2);
    assert_eq!(second.status, SubmissionStatus::Submitted);

    let latest = storage
        .get_latest_submission(assignment.id, student.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(latest.id, second.id);
    let all = storage
        .list_submissions_with_pagination(assignment.id, SubmissionListQuery::default())
        .await
        .unwrap();
    assert_eq!(all.pagination.total, 2);

    let mut once = new_submission(assignment.id, student.id);
    once.allow_resubmission = false;
    assert!(storage.create_submission(once).await.unwrap_err().is_conflict());
}

#[tokio::test]
async fn test_late_submission_status() {
    let storage = memory_storage().await;
    let teacher = seed_user(&storage, "teacher1", UserRole::Teacher).await;
    let student = seed_user(&storage, "student1", UserRole::Student).await;
    let course = storage
        .create_course(teacher.id, course_request("Art"))
        .await
        .unwrap();
    let assignment = storage
        .create_assignment(course.id, teacher.id, assignment_request("Sketch"))
        .await
        .unwrap();

    let mut late = new_submission(assignment.id, student.id);
    late.is_late = true;
    let submission = storage.create_submission(late).await.unwrap();
    assert!(submission.is_late);
    assert_eq!(submission.status, SubmissionStatus::Late);

    let late_only = storage
        .list_submissions_with_pagination(
            assignment.id,
            SubmissionListQuery {
                status: Some(SubmissionStatus::Late),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(late_only.pagination.total, 1);
}

#[tokio::test]
async fn test_grading_is_terminal() {
    let storage = memory_storage().await;
    let teacher = seed_user(&storage, "teacher1", UserRole::Teacher).await;
    let student = seed_user(&storage, "student1", UserRole::Student).await;
    let course = storage
        .create_course(teacher.id, course_request("Music"))
        .await
        .unwrap();
    let assignment = storage
        .create_assignment(course.id, teacher.id, assignment_request("Scales"))
        .await
        .unwrap();
    let submission = storage
        .create_submission(new_submission(assignment.id, student.id))
        .await
        .unwrap();

    let graded = storage
        .grade_submission(submission.id, teacher.id, 88.5, Some("good".to_string()))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(graded.status, SubmissionStatus::Graded);
    assert_eq!(graded.score, Some(88.5));
    assert_eq!(graded.graded_by, Some(teacher.id));
    assert!(graded.graded_at.is_some());

    // 重复评分、撤回、再次提交都被拒绝
    let regrade = storage
        .grade_submission(submission.id, teacher.id, 10.0, None)
        .await
        .unwrap_err();
    assert!(regrade.is_conflict());
    assert!(
        storage
            .delete_submission(submission.id)
            .await
            .unwrap_err()
            .is_conflict()
    );
    assert!(
        storage
            .create_submission(new_submission(assignment.id, student.id))
            .await
            .unwrap_err()
            .is_conflict()
    );

    assert!(
        storage
            .grade_submission(9999, teacher.id, 1.0, None)
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_graded_earlier_attempt_blocks_new_attempts() {
    let storage = memory_storage().await;
    let teacher = seed_user(&storage, "teacher1", UserRole::Teacher).await;
    let student = seed_user(&storage, "student1", UserRole::Student).await;
    let course = storage
        .create_course(teacher.id, course_request("Poetry"))
        .await
        .unwrap();
    let assignment = storage
        .create_assignment(course.id, teacher.id, assignment_request("Sonnet"))
        .await
        .unwrap();

    let first = storage
        .create_submission(new_submission(assignment.id, student.id))
        .await
        .unwrap();
    let second = storage
        .create_submission(new_submission(assignment.id, student.id))
        .await
        .unwrap();
    assert_eq!(second.attempt, 2);

    // 给较早的尝试评分，最新一次仍待评
    storage
        .grade_submission(first.id, teacher.id, 70.0, None)
        .await
        .unwrap()
        .unwrap();
    assert!(
        storage
            .has_graded_submission(assignment.id, student.id)
            .await
            .unwrap()
    );
    assert!(
        !storage
            .has_graded_submission(assignment.id, teacher.id)
            .await
            .unwrap()
    );

    let third = storage
        .create_submission(new_submission(assignment.id, student.id))
        .await
        .unwrap_err();
    assert!(third.is_conflict());

    let listed = storage
        .list_submissions_with_pagination(assignment.id, SubmissionListQuery::default())
        .await
        .unwrap();
    assert_eq!(listed.pagination.total, 2);
}

#[tokio::test]
async fn test_withdraw_ungraded_submission() {
    let storage = memory_storage().await;
    let teacher = seed_user(&storage, "teacher1", UserRole::Teacher).await;
    let student = seed_user(&storage, "student1", UserRole::Student).await;
    let course = storage
        .create_course(teacher.id, course_request("Drama"))
        .await
        .unwrap();
    let assignment = storage
        .create_assignment(course.id, teacher.id, assignment_request("Monologue"))
        .await
        .unwrap();
    let submission = storage
        .create_submission(new_submission(assignment.id, student.id))
        .await
        .unwrap();

    assert!(storage.delete_submission(submission.id).await.unwrap());
    assert!(!storage.delete_submission(submission.id).await.unwrap());

    // 撤回后序号重新从最新一次计算
    let again = storage
        .create_submission(new_submission(assignment.id, student.id))
        .await
        .unwrap();
    assert_eq!(again.attempt, 1);
}
