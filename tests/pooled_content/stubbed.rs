//! Step procedures driven against the recording stub.
//!
//! Each test starts from a world whose setup ran against the stub and which
//! already holds one pooled file. Routes are re-answered between steps to
//! play the service's side of the conversation.

use pooltest::content::TAG_RESOURCE_TYPE;
use pooltest_testing::{
    ADMIN_BASIC_AUTH,
    Method,
    RecordedRequest,
    StubServer,
    TestResult,
    config_for,
};
use rstest::{fixture, rstest};
use serde_json::{Value, json};
use tokio::runtime::Runtime;

use crate::{
    members::{Access, Role},
    world::ContentWorld,
};

const POOL_ID: &str = "gK3xWqpaa";
const CREATE_USER: &str = "/system/userManager/user.create.html";
const CREATE_FILE: &str = "/system/pool/createfile";
const PROP1: &str = "KERN-1536 allow arbitrary properties to be stored on a comment";

/// A prepared world plus the stub it talks to.
///
/// Fields drop in order: the world first, then the stub, then the runtime
/// serving it.
struct Stubbed {
    world: ContentWorld,
    stub: StubServer,
    _runtime: Runtime,
}

impl Stubbed {
    fn user(&mut self, short: &str) -> TestResult<String> {
        Ok(self.world.context()?.user(short)?.name().to_owned())
    }

    fn suffixed(&mut self, name: &str) -> TestResult<String> {
        Ok(self.world.context()?.suffixed(name))
    }

    fn comment_count(&self, count: i64) {
        self.stub.respond_json(
            Method::GET,
            &item(".infinity.json"),
            200,
            &json!({ "commentCount": count }),
        );
    }

    fn last_request(&self, method: &Method, path: &str) -> TestResult<RecordedRequest> {
        self.stub
            .requests_to(path)
            .into_iter()
            .rev()
            .find(|request| request.method() == method)
            .ok_or_else(|| format!("no {method} request reached {path}").into())
    }
}

fn item(suffix: &str) -> String { format!("/p/{POOL_ID}{suffix}") }

fn receipt() -> Value {
    json!({ "file1": { "poolId": POOL_ID, "item": { "_mimeType": "text/plain" } } })
}

#[fixture]
fn stubbed() -> TestResult<Stubbed> {
    let runtime = Runtime::new()?;
    let stub = runtime.block_on(StubServer::spawn())?;
    stub.respond(Method::POST, CREATE_USER, 200, "");
    stub.respond_json(Method::POST, CREATE_FILE, 201, &receipt());

    let mut world = ContentWorld::with_config(config_for(&stub)?);
    world.create_pooled_file()?;
    Ok(Stubbed {
        world,
        stub,
        _runtime: runtime,
    })
}

#[rstest]
fn setup_failure_is_reported_by_the_first_step() -> TestResult {
    let runtime = Runtime::new()?;
    let stub = runtime.block_on(StubServer::spawn())?;
    stub.respond(Method::POST, CREATE_USER, 500, "boom");

    let mut world = ContentWorld::with_config(config_for(&stub)?);
    let first = world.create_pooled_file().expect_err("setup failed");
    assert!(first.to_string().contains("500"), "unexpected error: {first}");
    let second = world.create_pooled_file().expect_err("still no context");
    assert!(matches!(second, pooltest::SuiteError::MissingState(_)));
    Ok(())
}

#[rstest]
fn new_file_can_be_read_and_versioned(stubbed: TestResult<Stubbed>) -> TestResult {
    let mut s = stubbed?;
    s.world.create_new_file()?;
    s.world.check_new_file_properties()?;

    s.stub.respond(Method::GET, &item(""), 200, "file contents");
    s.world.check_new_file_body()?;

    s.stub.respond(Method::POST, &format!("{CREATE_FILE}.{POOL_ID}"), 200, "");
    s.stub.respond(Method::GET, &item(""), 200, "modified contents");
    s.world.change_body_content()?;

    let version = s.last_request(&Method::POST, &format!("{CREATE_FILE}.{POOL_ID}"))?;
    assert!(version.body_text().contains("modified contents"));
    Ok(())
}

#[rstest]
fn anonymous_upload_is_refused(stubbed: TestResult<Stubbed>) -> TestResult {
    let mut s = stubbed?;
    s.stub.respond(Method::POST, CREATE_FILE, 405, "");
    s.world.create_new_file_as_anonymous()?;
    s.world.check_anonymous_upload_refused()?;

    let upload = s.last_request(&Method::POST, CREATE_FILE)?;
    assert_eq!(upload.header("authorization"), None);
    Ok(())
}

#[rstest]
fn anonymous_upload_that_creates_content_fails(stubbed: TestResult<Stubbed>) -> TestResult {
    let mut s = stubbed?;
    s.world.create_new_file_as_anonymous()?;
    let err = s
        .world
        .check_anonymous_upload_refused()
        .expect_err("a 201 must not pass");
    assert!(err.is_assertion());
    Ok(())
}

#[rstest]
#[case::viewer(Role::Viewer, ":viewer")]
#[case::editor(Role::Editor, ":editor")]
#[case::manager(Role::Manager, ":manager")]
fn grants_post_the_member_key(
    stubbed: TestResult<Stubbed>,
    #[case] role: Role,
    #[case] key: &str,
) -> TestResult {
    let mut s = stubbed?;
    let bob = s.user("bob")?;
    s.stub.respond(Method::POST, &item(".members.html"), 200, "");
    s.world.grant("bob", role)?;

    let request = s.last_request(&Method::POST, &item(".members.html"))?;
    assert_eq!(request.form_values(key), vec![bob]);
    Ok(())
}

#[rstest]
fn rejected_grant_fails_the_step(stubbed: TestResult<Stubbed>) -> TestResult {
    let mut s = stubbed?;
    s.stub.respond(Method::POST, &item(".members.html"), 403, "");
    let err = s.world.grant("carol", Role::Editor).expect_err("403");
    assert!(err.is_assertion());
    Ok(())
}

#[rstest]
#[case::read_only(json!(["Read"]), Access::Read, true)]
#[case::read_with_more(json!(["Read", "Write"]), Access::Read, false)]
#[case::read_write(json!(["Read", "Write"]), Access::ReadWrite, true)]
#[case::write_first(json!(["Write", "Read"]), Access::ReadWrite, false)]
#[case::full(json!(["Read", "Write", "Delete", "All"]), Access::Full, true)]
#[case::all_not_last(json!(["All", "Read"]), Access::Full, false)]
fn acl_grants_are_read_positionally(
    stubbed: TestResult<Stubbed>,
    #[case] granted: Value,
    #[case] access: Access,
    #[case] accepted: bool,
) -> TestResult {
    let mut s = stubbed?;
    let ted = s.user("ted")?;
    s.stub.respond_json(
        Method::GET,
        &item(".acl.json"),
        200,
        &json!({ ted.as_str(): { "granted": granted, "denied": [] } }),
    );
    let outcome = s.world.check_access("ted", access);
    assert_eq!(outcome.is_ok(), accepted, "unexpected outcome: {outcome:?}");
    Ok(())
}

#[rstest]
fn member_access_checks_compare_statuses(stubbed: TestResult<Stubbed>) -> TestResult {
    let mut s = stubbed?;
    s.world.context()?.act_as("alice")?;

    s.world.read_file(404)?;
    s.world.view_acl(404)?;
    s.stub.respond(Method::POST, &item(""), 403, "");
    s.world.delete_file(403)?;

    s.stub.respond(Method::GET, &item(""), 200, "file contents");
    assert!(s.world.read_file(404).is_err());
    Ok(())
}

#[rstest]
fn written_property_must_persist(stubbed: TestResult<Stubbed>) -> TestResult {
    let mut s = stubbed?;
    s.stub.respond(Method::POST, &item(""), 200, "");
    s.stub.respond_json(
        Method::GET,
        &item(".infinity.json"),
        200,
        &json!({ "otheruserprop": "value" }),
    );
    s.world.write_file()?;

    s.stub.respond_json(Method::GET, &item(".infinity.json"), 200, &json!({}));
    let err = s.world.write_file().expect_err("property missing");
    assert!(err.is_assertion());
    Ok(())
}

#[rstest]
fn everyone_is_made_manager_by_the_administrator(stubbed: TestResult<Stubbed>) -> TestResult {
    let mut s = stubbed?;
    s.stub.respond(Method::POST, &item(".members.html"), 200, "");
    s.world.context()?.act_as("alice")?;
    s.world.grant_everyone_manage()?;

    let request = s.last_request(&Method::POST, &item(".members.html"))?;
    assert_eq!(request.header("authorization"), Some(ADMIN_BASIC_AUTH));
    assert_eq!(request.form_values(":viewer"), vec!["everyone".to_owned()]);
    assert_eq!(request.form_values(":manager"), vec!["everyone".to_owned()]);
    Ok(())
}

#[rstest]
fn bogus_comment_is_rejected_without_counting(stubbed: TestResult<Stubbed>) -> TestResult {
    let mut s = stubbed?;
    s.stub.respond(Method::POST, &item(".comments"), 400, "");
    s.comment_count(0);
    s.world.post_bogus_comment()?;

    s.comment_count(1);
    let err = s.world.post_bogus_comment().expect_err("count moved");
    assert!(err.is_assertion());
    Ok(())
}

#[rstest]
fn comment_lifecycle_tracks_the_count(stubbed: TestResult<Stubbed>) -> TestResult {
    let mut s = stubbed?;
    let bob = s.user("bob")?;
    let comment_id = format!("{POOL_ID}/comments/c1");

    s.stub.respond_json(Method::GET, &item(".comments"), 200, &json!({ "comments": [] }));
    s.world.check_no_comments()?;

    s.world.context()?.act_as("bob")?;
    s.stub.respond_json(
        Method::POST,
        &item(".comments"),
        201,
        &json!({ "commentId": comment_id }),
    );
    s.world.post_comment()?;

    s.stub.respond_json(
        Method::GET,
        &item(".comments"),
        200,
        &json!({ "comments": [{
            "commentId": comment_id,
            "comment": "something witty",
            "hash": bob,
            "basic": { "elements": { "lastName": { "value": "Builder" } } },
        }] }),
    );
    s.stub.respond_json(Method::GET, &format!("/p/{comment_id}"), 200, &json!({ "prop1": PROP1 }));
    s.comment_count(1);
    s.world.check_comment_posted()?;

    s.stub.respond(Method::DELETE, &item(".comments"), 204, "");
    s.comment_count(0);
    s.world.delete_comment()?;

    let deletion = s.last_request(&Method::DELETE, &item(".comments"))?;
    assert_eq!(deletion.query(), Some("commentId=gK3xWqpaa%2Fcomments%2Fc1"));
    Ok(())
}

#[rstest]
#[case::deleted(204, 0, true)]
#[case::not_counted_down(204, 1, false)]
#[case::wrong_status(200, 0, false)]
fn comment_deletion_requires_no_content_and_a_lower_count(
    stubbed: TestResult<Stubbed>,
    #[case] status: u16,
    #[case] count: i64,
    #[case] accepted: bool,
) -> TestResult {
    let mut s = stubbed?;
    s.world.context()?.set_comment_id(format!("{POOL_ID}/comments/c1"));
    s.stub.respond(Method::DELETE, &item(".comments"), status, "");
    s.comment_count(count);
    let outcome = s.world.delete_comment();
    assert_eq!(outcome.is_ok(), accepted, "unexpected outcome: {outcome:?}");
    Ok(())
}

#[rstest]
#[case::author_edit(200, 200, true)]
#[case::viewer_refused(403, 403, true)]
#[case::viewer_allowed(200, 403, false)]
fn comment_edits_compare_statuses(
    stubbed: TestResult<Stubbed>,
    #[case] answered: u16,
    #[case] expected: u16,
    #[case] accepted: bool,
) -> TestResult {
    let mut s = stubbed?;
    s.world.context()?.set_comment_id(format!("{POOL_ID}/comments/c1"));
    s.stub.respond(Method::POST, &item(".comments"), answered, "");
    let outcome = s.world.edit_comment_as("a rejoinder", expected);
    assert_eq!(outcome.is_ok(), accepted, "unexpected outcome: {outcome:?}");

    let edit = s.last_request(&Method::POST, &item(".comments"))?;
    assert_eq!(edit.form_values("commentId"), vec![format!("{POOL_ID}/comments/c1")]);
    Ok(())
}

fn tag_node(name: &str, count: i64) -> Value {
    json!({
        "sling:resourceType": TAG_RESOURCE_TYPE,
        "sakai:tag-name": name,
        "sakai:tag-count": count,
    })
}

#[rstest]
fn single_tag_is_counted_and_listed(stubbed: TestResult<Stubbed>) -> TestResult {
    let mut s = stubbed?;
    let tag = s.suffixed("foo")?;
    s.stub.respond(Method::POST, &item(""), 200, "");
    s.stub.respond_json(Method::GET, &format!("/tags/{tag}"), 200, &tag_node(&tag, 1));
    s.stub.respond_json(Method::GET, &item(".infinity.json"), 200, &json!({ "sakai:tags": [tag] }));
    s.world.tag_with_single_tag()?;

    let request = s.last_request(&Method::POST, &item(""))?;
    assert_eq!(request.form_values(":operation"), vec!["tag".to_owned()]);
    assert_eq!(request.form_values("key"), vec![format!("/tags/{tag}")]);
    Ok(())
}

#[rstest]
fn tag_counted_twice_fails(stubbed: TestResult<Stubbed>) -> TestResult {
    let mut s = stubbed?;
    let tag = s.suffixed("foo")?;
    s.stub.respond(Method::POST, &item(""), 200, "");
    s.stub.respond_json(Method::GET, &format!("/tags/{tag}"), 200, &tag_node(&tag, 2));
    let err = s.world.tag_with_single_tag().expect_err("count 2");
    assert!(err.to_string().contains("count"), "unexpected error: {err}");
    Ok(())
}

#[rstest]
fn multiple_tags_must_all_be_listed(stubbed: TestResult<Stubbed>) -> TestResult {
    let mut s = stubbed?;
    let first = s.suffixed("first")?;
    let second = s.suffixed("second")?;
    s.stub.respond(Method::POST, &item(""), 200, "");
    s.stub.respond_json(Method::GET, &format!("/tags/{first}"), 200, &tag_node(&first, 1));
    s.stub.respond_json(Method::GET, &format!("/tags/{second}"), 200, &tag_node(&second, 1));
    s.stub.respond_json(
        Method::GET,
        &item(".infinity.json"),
        200,
        &json!({ "sakai:tags": [second, first] }),
    );
    s.world.tag_with_multiple_tags()?;

    let request = s.last_request(&Method::POST, &item(""))?;
    assert_eq!(
        request.form_values("key"),
        vec![format!("/tags/{first}"), format!("/tags/{second}")]
    );

    s.stub.respond_json(
        Method::GET,
        &item(".infinity.json"),
        200,
        &json!({ "sakai:tags": [first] }),
    );
    let err = s.world.tag_with_multiple_tags().expect_err("second missing");
    assert!(err.to_string().contains("Second Tag"), "unexpected error: {err}");
    Ok(())
}
