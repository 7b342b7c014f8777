//! HTTP 流程测试：内存 SQLite + Moka 缓存，经过完整的中间件链

use actix_web::cookie::Cookie;
use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use serde_json::{Value, json};
use std::sync::Arc;

use super::configure_api_routes;
use crate::cache::ObjectCache;
use crate::cache::object_cache::moka::MokaObjectCache;
use crate::models::assignments::requests::CreateAssignmentRequest;
use crate::models::courses::entities::CourseRole;
use crate::models::courses::requests::CreateCourseRequest;
use crate::models::users::entities::{User, UserRole, UserStatus};
use crate::models::users::requests::CreateUserRequest;
use crate::storage::Storage;
use crate::storage::sea_orm_storage::SeaOrmStorage;
use crate::utils::jwt::{JwtUtils, REFRESH_TOKEN_COOKIE};
use crate::utils::password::hash_password;
use crate::utils::{json_error_handler, query_error_handler};

struct Fixture {
    storage: Arc<dyn Storage>,
    cache: Arc<dyn ObjectCache>,
}

impl Fixture {
    async fn new() -> Self {
        let storage = SeaOrmStorage::connect("sqlite::memory:", 1, 5)
            .await
            .expect("in-memory storage");
        Self {
            storage: Arc::new(storage),
            cache: Arc::new(MokaObjectCache::new(1_000, 60)),
        }
    }

    async fn user(&self, username: &str, role: UserRole, password_hash: &str) -> User {
        self.storage
            .create_user(CreateUserRequest {
                username: username.to_string(),
                email: format!("{username}@example.edu"),
                password: password_hash.to_string(),
                role,
                display_name: None,
                avatar_url: None,
            })
            .await
            .expect("create user")
    }
}

fn bearer(user: &User) -> (header::HeaderName, String) {
    let token = JwtUtils::generate_access_token(user.id, &user.role.to_string())
        .expect("access token");
    (header::AUTHORIZATION, format!("Bearer {token}"))
}

macro_rules! portal_app {
    ($fixture:expr) => {
        test::init_service(
            App::new()
                .app_data(web::QueryConfig::default().error_handler(query_error_handler))
                .app_data(web::JsonConfig::default().error_handler(json_error_handler))
                .app_data(web::Data::new($fixture.storage.clone()))
                .app_data(web::Data::new($fixture.cache.clone()))
                .configure(configure_api_routes),
        )
        .await
    };
}

/// 发送请求并解析 JSON 响应体
macro_rules! send {
    ($app:expr, $req:expr) => {{
        let resp = test::call_service(&$app, $req.to_request()).await;
        let status = resp.status();
        let body: Value = test::read_body_json(resp).await;
        (status, body)
    }};
}

#[actix_web::test]
async fn test_login_sets_refresh_cookie_and_me_works() {
    let fixture = Fixture::new().await;
    let hash = hash_password("Coursework42").unwrap();
    fixture.user("alice", UserRole::Student, &hash).await;
    let app = portal_app!(fixture);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .peer_addr("10.1.0.1:4000".parse().unwrap())
            .set_json(json!({"username": "alice", "password": "Coursework42"}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(
        resp.response()
            .cookies()
            .any(|c| c.name() == "refresh_token" && c.http_only() == Some(true))
    );
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 0);
    let token = body["data"]["access_token"].as_str().unwrap().to_string();

    let (status, body) = send!(
        app,
        test::TestRequest::get()
            .uri("/api/v1/auth/me")
            .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["username"], "alice");
    assert!(body["data"].get("password_hash").is_none());

    // 用户不存在与密码错误返回同样的错误
    for (username, password) in [("alice", "WrongPass99"), ("nobody", "Coursework42")] {
        let (status, body) = send!(
            app,
            test::TestRequest::post()
                .uri("/api/v1/auth/login")
                .peer_addr("10.1.0.1:4000".parse().unwrap())
                .set_json(json!({"username": username, "password": password}))
        );
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], 2000);
    }
}

#[actix_web::test]
async fn test_login_rate_limited_per_ip() {
    let fixture = Fixture::new().await;
    let app = portal_app!(fixture);

    let mut last = StatusCode::OK;
    for _ in 0..6 {
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/auth/login")
                .peer_addr("10.1.0.2:4000".parse().unwrap())
                .set_json(json!({"username": "ghost", "password": "Whatever123"}))
                .to_request(),
        )
        .await;
        last = resp.status();
    }
    assert_eq!(last, StatusCode::TOO_MANY_REQUESTS);
}

#[actix_web::test]
async fn test_protected_routes_reject_missing_token_and_bad_ids() {
    let fixture = Fixture::new().await;
    let student = fixture.user("bobby", UserRole::Student, "x").await;
    let app = portal_app!(fixture);

    let (status, body) = send!(app, test::TestRequest::get().uri("/api/v1/courses"));
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1001);

    let (status, _) = send!(
        app,
        test::TestRequest::get()
            .uri("/api/v1/courses/abc")
            .insert_header(bearer(&student))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send!(
        app,
        test::TestRequest::get()
            .uri("/api/v1/users")
            .insert_header(bearer(&student))
    );
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 1003);
}

#[actix_web::test]
async fn test_enroll_submit_grade_flow() {
    let fixture = Fixture::new().await;
    let teacher = fixture.user("teacher1", UserRole::Teacher, "x").await;
    let student = fixture.user("student1", UserRole::Student, "x").await;
    let outsider = fixture.user("student2", UserRole::Student, "x").await;
    let app = portal_app!(fixture);

    // 学生不能创建课程
    let (status, _) = send!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/courses")
            .insert_header(bearer(&student))
            .set_json(json!({"title": "Nope"}))
    );
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/courses")
            .insert_header(bearer(&teacher))
            .set_json(json!({"title": "Compilers", "owner_id": outsider.id}))
    );
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["owner_id"], teacher.id);
    let course_id = body["data"]["id"].as_i64().unwrap();
    let invite_code = body["data"]["invite_code"].as_str().unwrap().to_lowercase();

    let (status, body) = send!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/courses/join")
            .insert_header(bearer(&student))
            .set_json(json!({"invite_code": format!(" {invite_code} ")}))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["role"], "student");

    let (status, body) = send!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/courses/join")
            .insert_header(bearer(&student))
            .set_json(json!({"invite_code": invite_code}))
    );
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 4004);

    let (status, body) = send!(
        app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/courses/{course_id}"))
            .insert_header(bearer(&outsider))
    );
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 4001);

    let (status, body) = send!(
        app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/courses/{course_id}"))
            .insert_header(bearer(&student))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["my_role"], "student");
    assert!(body["data"]["course"].get("invite_code").is_none());

    // 作业
    let due_at = (chrono::Utc::now() + chrono::TimeDelta::days(1)).to_rfc3339();
    let (status, body) = send!(
        app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/courses/{course_id}/assignments"))
            .insert_header(bearer(&student))
            .set_json(json!({"title": "Lab 1"}))
    );
    assert_eq!(status, StatusCode::FORBIDDEN, "{body}");

    let (status, body) = send!(
        app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/courses/{course_id}/assignments"))
            .insert_header(bearer(&teacher))
            .set_json(json!({"title": "Lab 1", "max_score": 10.0, "due_at": due_at}))
    );
    assert_eq!(status, StatusCode::CREATED);
    let assignment_id = body["data"]["id"].as_i64().unwrap();

    // 两次提交，尝试序号递增
    let mut submission_id = 0;
    for expected_attempt in [1, 2] {
        let (status, body) = send!(
            app,
            test::TestRequest::post()
                .uri(&format!("/api/v1/assignments/{assignment_id}/submissions"))
                .insert_header(bearer(&student))
                .set_json(json!({"content": format!("answer v{expected_attempt}")}))
        );
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["attempt"], expected_attempt);
        assert_eq!(body["data"]["status"], "submitted");
        submission_id = body["data"]["id"].as_i64().unwrap();
    }

    let (status, body) = send!(
        app,
        test::TestRequest::get()
            .uri(&format!(
                "/api/v1/assignments/{assignment_id}/submissions/my/latest"
            ))
            .insert_header(bearer(&student))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], submission_id);

    // 教师能看到全部尝试
    let (status, body) = send!(
        app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/assignments/{assignment_id}/submissions"))
            .insert_header(bearer(&teacher))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["pagination"]["total"], 2);

    let (status, _) = send!(
        app,
        test::TestRequest::put()
            .uri(&format!("/api/v1/submissions/{submission_id}/grade"))
            .insert_header(bearer(&student))
            .set_json(json!({"score": 10.0}))
    );
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send!(
        app,
        test::TestRequest::put()
            .uri(&format!("/api/v1/submissions/{submission_id}/grade"))
            .insert_header(bearer(&teacher))
            .set_json(json!({"score": 11.0}))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 6004);

    let (status, body) = send!(
        app,
        test::TestRequest::put()
            .uri(&format!("/api/v1/submissions/{submission_id}/grade"))
            .insert_header(bearer(&teacher))
            .set_json(json!({"score": 9.5, "feedback": "Nice work"}))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "graded");
    assert_eq!(body["data"]["graded_by"], teacher.id);

    let (status, body) = send!(
        app,
        test::TestRequest::put()
            .uri(&format!("/api/v1/submissions/{submission_id}/grade"))
            .insert_header(bearer(&teacher))
            .set_json(json!({"score": 5.0}))
    );
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 6002);

    // 评分后不能再提交或撤回
    let (status, body) = send!(
        app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/assignments/{assignment_id}/submissions"))
            .insert_header(bearer(&student))
            .set_json(json!({"content": "one more"}))
    );
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 6002);

    let (status, _) = send!(
        app,
        test::TestRequest::delete()
            .uri(&format!("/api/v1/submissions/{submission_id}"))
            .insert_header(bearer(&student))
    );
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send!(
        app,
        test::TestRequest::delete()
            .uri(&format!("/api/v1/assignments/{assignment_id}"))
            .insert_header(bearer(&teacher))
    );
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 5004);
}

#[actix_web::test]
async fn test_archived_course_is_read_only() {
    let fixture = Fixture::new().await;
    let teacher = fixture.user("teacher2", UserRole::Teacher, "x").await;
    let student = fixture.user("student3", UserRole::Student, "x").await;

    let course = fixture
        .storage
        .create_course(
            teacher.id,
            CreateCourseRequest {
                title: "Databases".to_string(),
                description: None,
                owner_id: None,
            },
        )
        .await
        .unwrap();
    fixture
        .storage
        .add_course_member(course.id, student.id, CourseRole::Student)
        .await
        .unwrap();
    let app = portal_app!(fixture);

    let (status, body) = send!(
        app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/courses/{}/assignments", course.id))
            .insert_header(bearer(&teacher))
            .set_json(json!({"title": "Schema design", "allow_late": true}))
    );
    assert_eq!(status, StatusCode::CREATED);
    let assignment_id = body["data"]["id"].as_i64().unwrap();

    let (status, _) = send!(
        app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/courses/{}/archive", course.id))
            .insert_header(bearer(&student))
    );
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send!(
        app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/courses/{}/archive", course.id))
            .insert_header(bearer(&teacher))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "archived");

    let (status, body) = send!(
        app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/assignments/{assignment_id}/submissions"))
            .insert_header(bearer(&student))
            .set_json(json!({"content": "late answer"}))
    );
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 4002);

    let (status, body) = send!(
        app,
        test::TestRequest::put()
            .uri(&format!("/api/v1/courses/{}", course.id))
            .insert_header(bearer(&teacher))
            .set_json(json!({"title": "Databases II"}))
    );
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 4002);

    // 默认列表不含已归档课程
    let (status, body) = send!(
        app,
        test::TestRequest::get()
            .uri("/api/v1/courses")
            .insert_header(bearer(&student))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["pagination"]["total"], 0);

    let (status, body) = send!(
        app,
        test::TestRequest::get()
            .uri("/api/v1/courses?include_archived=true")
            .insert_header(bearer(&student))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["pagination"]["total"], 1);

    let (status, _) = send!(
        app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/courses/{}/unarchive", course.id))
            .insert_header(bearer(&teacher))
    );
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send!(
        app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/assignments/{assignment_id}/submissions"))
            .insert_header(bearer(&student))
            .set_json(json!({"content": "answer"}))
    );
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["attempt"], 1);
}

#[actix_web::test]
async fn test_member_management_rules() {
    let fixture = Fixture::new().await;
    let teacher = fixture.user("teacher3", UserRole::Teacher, "x").await;
    let student = fixture.user("student4", UserRole::Student, "x").await;
    let course = fixture
        .storage
        .create_course(
            teacher.id,
            CreateCourseRequest {
                title: "Networks".to_string(),
                description: None,
                owner_id: None,
            },
        )
        .await
        .unwrap();
    let app = portal_app!(fixture);

    let (status, body) = send!(
        app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/courses/{}/members", course.id))
            .insert_header(bearer(&teacher))
            .set_json(json!({"user_id": student.id, "role": "instructor"}))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 4007);

    let (status, _) = send!(
        app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/courses/{}/members", course.id))
            .insert_header(bearer(&teacher))
            .set_json(json!({"user_id": student.id, "role": "assistant"}))
    );
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send!(
        app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/courses/{}/members", course.id))
            .insert_header(bearer(&teacher))
            .set_json(json!({"user_id": 9999, "role": "student"}))
    );
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 3000);

    let (status, body) = send!(
        app,
        test::TestRequest::delete()
            .uri(&format!("/api/v1/courses/{}/members/{}", course.id, teacher.id))
            .insert_header(bearer(&teacher))
    );
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 4006);

    let (status, body) = send!(
        app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/courses/{}/members?role=assistant", course.id))
            .insert_header(bearer(&student))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["items"][0]["username"], "student4");

    // 成员可以自行退出
    let (status, _) = send!(
        app,
        test::TestRequest::delete()
            .uri(&format!("/api/v1/courses/{}/members/{}", course.id, student.id))
            .insert_header(bearer(&student))
    );
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send!(
        app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/courses/{}", course.id))
            .insert_header(bearer(&student))
    );
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn test_admin_disables_user_and_session_is_evicted() {
    let fixture = Fixture::new().await;
    let admin = fixture.user("root_admin", UserRole::Admin, "x").await;
    let app = portal_app!(fixture);

    let (status, body) = send!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/users")
            .insert_header(bearer(&admin))
            .set_json(json!({
                "username": "teacher4",
                "email": "Teacher4@Example.edu",
                "password": "SecurePass123",
                "role": "teacher"
            }))
    );
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["email"], "teacher4@example.edu");
    let teacher_id = body["data"]["id"].as_i64().unwrap();
    let teacher = fixture
        .storage
        .get_user_by_id(teacher_id)
        .await
        .unwrap()
        .unwrap();

    // 先请求一次，把用户写入会话缓存
    let (status, _) = send!(
        app,
        test::TestRequest::get()
            .uri("/api/v1/auth/me")
            .insert_header(bearer(&teacher))
    );
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send!(
        app,
        test::TestRequest::delete()
            .uri(&format!("/api/v1/users/{}", admin.id))
            .insert_header(bearer(&admin))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 3008);

    let (status, body) = send!(
        app,
        test::TestRequest::delete()
            .uri(&format!("/api/v1/users/{teacher_id}"))
            .insert_header(bearer(&admin))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "disabled");

    let (status, body) = send!(
        app,
        test::TestRequest::get()
            .uri("/api/v1/auth/me")
            .insert_header(bearer(&teacher))
    );
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 2001);

    let (status, _) = send!(
        app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/users/{teacher_id}/enable"))
            .insert_header(bearer(&admin))
    );
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send!(
        app,
        test::TestRequest::get()
            .uri("/api/v1/auth/me")
            .insert_header(bearer(&teacher))
    );
    assert_eq!(status, StatusCode::OK);
}

fn refresh_cookie<B>(resp: &actix_web::dev::ServiceResponse<B>) -> Option<String> {
    resp.response()
        .cookies()
        .find(|c| c.name() == REFRESH_TOKEN_COOKIE)
        .map(|c| c.value().to_string())
}

#[actix_web::test]
async fn test_register_verify_email_and_change_email() {
    let fixture = Fixture::new().await;
    let app = portal_app!(fixture);

    let (status, body) = send!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/auth/register")
            .peer_addr("10.1.0.3:4000".parse().unwrap())
            .set_json(json!({
                "username": "carol",
                "email": "carol@example.edu",
                "password": "Coursework42",
                "role": "admin"
            }))
    );
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["user"]["role"], "student");
    assert_eq!(body["data"]["user"]["email_verified"], false);
    let first_token = body["data"]["verification_token"]
        .as_str()
        .unwrap()
        .to_string();

    let (status, body) = send!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/auth/register")
            .peer_addr("10.1.0.3:4000".parse().unwrap())
            .set_json(json!({
                "username": "carol",
                "email": "other@example.edu",
                "password": "Coursework42"
            }))
    );
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 3005);

    let carol = fixture
        .storage
        .get_user_by_username("carol")
        .await
        .unwrap()
        .unwrap();

    let (status, _) = send!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/auth/verify-email")
            .set_json(json!({"token": first_token}))
    );
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send!(
        app,
        test::TestRequest::get()
            .uri("/api/v1/auth/me")
            .insert_header(bearer(&carol))
    );
    assert_eq!(body["data"]["email_verified"], true);

    // 修改显示名不影响验证状态
    let (status, body) = send!(
        app,
        test::TestRequest::put()
            .uri("/api/v1/auth/me")
            .insert_header(bearer(&carol))
            .set_json(json!({"display_name": "Carol C."}))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["display_name"], "Carol C.");
    assert_eq!(body["data"]["email_verified"], true);
    assert!(body["data"].get("verification_token").is_none());

    let (status, body) = send!(
        app,
        test::TestRequest::put()
            .uri("/api/v1/auth/me")
            .insert_header(bearer(&carol))
            .set_json(json!({"email": "Carol.New@Example.edu"}))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], "carol.new@example.edu");
    assert_eq!(body["data"]["email_verified"], false);
    assert_eq!(body["data"]["role"], "student");
    let second_token = body["data"]["verification_token"]
        .as_str()
        .unwrap()
        .to_string();

    // 旧邮箱的令牌不能验证新邮箱
    let (status, body) = send!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/auth/verify-email")
            .set_json(json!({"token": first_token}))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 2003);

    let (status, _) = send!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/auth/verify-email")
            .set_json(json!({"token": second_token}))
    );
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send!(
        app,
        test::TestRequest::get()
            .uri("/api/v1/auth/me")
            .insert_header(bearer(&carol))
    );
    assert_eq!(body["data"]["email_verified"], true);

    let (status, body) = send!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/auth/verify-email")
            .set_json(json!({"token": "garbage"}))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 2003);
}

#[actix_web::test]
async fn test_refresh_logout_and_disabled_refresh() {
    let fixture = Fixture::new().await;
    let hash = hash_password("Coursework42").unwrap();
    let dave = fixture.user("dave", UserRole::Student, &hash).await;
    let app = portal_app!(fixture);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .peer_addr("10.1.0.4:4000".parse().unwrap())
            .set_json(json!({"username": "dave@example.edu", "password": "Coursework42"}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let refresh_token = refresh_cookie(&resp).unwrap();

    let (status, body) = send!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/auth/refresh")
            .peer_addr("10.1.0.4:4000".parse().unwrap())
            .cookie(Cookie::new(REFRESH_TOKEN_COOKIE, refresh_token.clone()))
    );
    assert_eq!(status, StatusCode::OK);
    let access_token = body["data"]["access_token"].as_str().unwrap().to_string();

    let (status, body) = send!(
        app,
        test::TestRequest::get()
            .uri("/api/v1/auth/verify-token")
            .insert_header((header::AUTHORIZATION, format!("Bearer {access_token}")))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["is_valid"], true);

    // access token 不能当作 refresh token
    let (status, body) = send!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/auth/refresh")
            .peer_addr("10.1.0.4:4000".parse().unwrap())
            .cookie(Cookie::new(REFRESH_TOKEN_COOKIE, access_token))
    );
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 2003);

    let (status, body) = send!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/auth/refresh")
            .peer_addr("10.1.0.4:4000".parse().unwrap())
    );
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1001);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/auth/logout")
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(refresh_cookie(&resp).as_deref(), Some(""));

    // 停用后刷新返回 403 并清除 cookie
    fixture
        .storage
        .set_user_status(dave.id, UserStatus::Disabled)
        .await
        .unwrap()
        .unwrap();
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/auth/refresh")
            .peer_addr("10.1.0.4:4000".parse().unwrap())
            .cookie(Cookie::new(REFRESH_TOKEN_COOKIE, refresh_token))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert_eq!(refresh_cookie(&resp).as_deref(), Some(""));
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 2001);
}

#[actix_web::test]
async fn test_password_reset_token_is_single_use() {
    let fixture = Fixture::new().await;
    let hash = hash_password("Coursework42").unwrap();
    fixture.user("erin", UserRole::Student, &hash).await;
    let app = portal_app!(fixture);

    let (status, body) = send!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/auth/password-reset/request")
            .peer_addr("10.1.0.5:4000".parse().unwrap())
            .set_json(json!({"email": "ERIN@example.edu"}))
    );
    assert_eq!(status, StatusCode::OK);
    let reset_token = body["data"]["reset_token"].as_str().unwrap().to_string();

    let (status, _) = send!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/auth/password-reset/confirm")
            .peer_addr("10.1.0.5:4000".parse().unwrap())
            .set_json(json!({"token": reset_token, "new_password": "BrandNew2024"}))
    );
    assert_eq!(status, StatusCode::OK);

    // 同一秒内重用也会被拒绝
    let (status, body) = send!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/auth/password-reset/confirm")
            .peer_addr("10.1.0.5:4000".parse().unwrap())
            .set_json(json!({"token": reset_token, "new_password": "Another2024x"}))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 2003);

    let (status, _) = send!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .peer_addr("10.1.0.5:4000".parse().unwrap())
            .set_json(json!({"username": "erin", "password": "Coursework42"}))
    );
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .peer_addr("10.1.0.5:4000".parse().unwrap())
            .set_json(json!({"username": "erin", "password": "BrandNew2024"}))
    );
    assert_eq!(status, StatusCode::OK);

    // 未注册邮箱同样返回 200，但没有令牌
    let (status, body) = send!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/auth/password-reset/request")
            .peer_addr("10.1.0.6:4000".parse().unwrap())
            .set_json(json!({"email": "nobody@example.edu"}))
    );
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].get("reset_token").is_none());
}

#[actix_web::test]
async fn test_oidc_config_is_public() {
    let fixture = Fixture::new().await;
    let app = portal_app!(fixture);

    let (status, body) = send!(
        app,
        test::TestRequest::get().uri("/api/v1/auth/oidc-config")
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["enabled"], false);
    assert_eq!(body["data"]["response_type"], "code");
    assert_eq!(body["data"]["scope"], "openid profile email");
}

#[actix_web::test]
async fn test_past_due_assignment_is_frozen() {
    let fixture = Fixture::new().await;
    let teacher = fixture.user("teacher5", UserRole::Teacher, "x").await;
    let admin = fixture.user("admin5", UserRole::Admin, "x").await;
    let course = fixture
        .storage
        .create_course(
            teacher.id,
            CreateCourseRequest {
                title: "Operating Systems".to_string(),
                description: None,
                owner_id: None,
            },
        )
        .await
        .unwrap();
    let assignment = fixture
        .storage
        .create_assignment(
            course.id,
            teacher.id,
            CreateAssignmentRequest {
                title: "Scheduler".to_string(),
                description: None,
                max_score: None,
                due_at: Some(chrono::Utc::now() - chrono::TimeDelta::hours(1)),
                allow_late: None,
                allow_resubmission: None,
            },
        )
        .await
        .unwrap();
    let app = portal_app!(fixture);

    for user in [&teacher, &admin] {
        let (status, body) = send!(
            app,
            test::TestRequest::put()
                .uri(&format!("/api/v1/assignments/{}", assignment.id))
                .insert_header(bearer(user))
                .set_json(json!({"title": "Scheduler v2"}))
        );
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], 5002);
    }

    // 没有提交的作业仍可删除
    let (status, _) = send!(
        app,
        test::TestRequest::delete()
            .uri(&format!("/api/v1/assignments/{}", assignment.id))
            .insert_header(bearer(&teacher))
    );
    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn test_invite_code_visible_to_instructors_in_list() {
    let fixture = Fixture::new().await;
    let owner = fixture.user("teacher6", UserRole::Teacher, "x").await;
    let co_teacher = fixture.user("teacher7", UserRole::Teacher, "x").await;
    let student = fixture.user("student6", UserRole::Student, "x").await;
    let course = fixture
        .storage
        .create_course(
            owner.id,
            CreateCourseRequest {
                title: "Graphics".to_string(),
                description: None,
                owner_id: None,
            },
        )
        .await
        .unwrap();
    fixture
        .storage
        .add_course_member(course.id, co_teacher.id, CourseRole::Instructor)
        .await
        .unwrap();
    fixture
        .storage
        .add_course_member(course.id, student.id, CourseRole::Student)
        .await
        .unwrap();
    let app = portal_app!(fixture);

    for (user, visible) in [(&owner, true), (&co_teacher, true), (&student, false)] {
        let (status, body) = send!(
            app,
            test::TestRequest::get()
                .uri("/api/v1/courses")
                .insert_header(bearer(user))
        );
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["pagination"]["total"], 1);
        assert_eq!(
            body["data"]["items"][0].get("invite_code").is_some(),
            visible,
            "{}",
            user.username
        );
    }
}
