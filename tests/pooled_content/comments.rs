//! Comment lifecycle on the item under test.

use pooltest::{
    LogVerbosity,
    Result,
    ScenarioContext,
    SuiteError,
    content::{CommentListing, MemberChanges},
    expect,
    session::{FormFields, HttpResponse},
};
use tracing::info;

use crate::world::ContentWorld;

const COMMENT: &str = "something witty";
const EDITED_COMMENT: &str = "modified witty";
const PROP1: &str = "KERN-1536 allow arbitrary properties to be stored on a comment";
const EVERYONE: &str = "everyone";

impl ContentWorld {
    pub fn grant_everyone_read(&mut self) -> Result<()> {
        let (runtime, context) = self.parts()?;
        runtime.block_on(async {
            let changes = MemberChanges::new().add_viewer(EVERYONE);
            let response = context
                .files()
                .manage_members(context.pool_id()?, &changes)
                .await?;
            info!(%response, "granted everyone read access");
            Ok(())
        })
    }

    /// As the administrator, make everyone a viewer and a manager.
    pub fn grant_everyone_manage(&mut self) -> Result<()> {
        let (runtime, context) = self.parts()?;
        context.act_as_admin()?;
        runtime.block_on(async {
            let changes = MemberChanges::new()
                .add_viewer(EVERYONE)
                .add_manager(EVERYONE);
            let response = context
                .files()
                .manage_members(context.pool_id()?, &changes)
                .await?;
            info!(%response, body = response.body(), "granted everyone management");
            Ok(())
        })
    }

    pub fn check_no_comments(&mut self) -> Result<()> {
        let (runtime, context) = self.parts()?;
        runtime.block_on(async {
            let listing = fetch_comments(context).await?;
            expect::that(listing.is_empty(), "A new file should not have any comments")
        })
    }

    /// A post without a `comment` field is rejected and counts nothing.
    pub fn post_bogus_comment(&mut self) -> Result<()> {
        let (runtime, context) = self.parts()?;
        runtime.block_on(async {
            let response = send_comment(context, FormFields::new().field("foo", "bar")).await?;
            expect::status(&response, 400, "A comment without a body should be rejected")?;
            let view = context.fetch_view().await?;
            expect::equal(
                &view.comment_count()?,
                &0_i64,
                "A rejected comment changed the comment count",
            )
        })
    }

    pub fn post_comment(&mut self) -> Result<()> {
        let (runtime, context) = self.parts()?;
        runtime.block_on(async {
            let form = FormFields::new()
                .field("comment", COMMENT)
                .field("prop1", PROP1);
            let response = send_comment(context, form).await?;
            expect::status(&response, 201, "Comment should have posted successfully")?;
            let document = response.json()?;
            let comment_id = document.root().field("commentId")?.as_str()?.to_owned();
            expect::that(
                !comment_id.is_empty(),
                "Comment ID should have come back to us",
            )?;
            context.record(response);
            Ok(())
        })
    }

    /// The first listed comment is ours, carries its author's profile and
    /// its extra property, and is counted on the item.
    pub fn check_comment_posted(&mut self) -> Result<()> {
        let (runtime, context) = self.parts()?;
        runtime.block_on(async {
            let listing = fetch_comments(context).await?;
            let comment = listing
                .first()
                .ok_or_else(|| SuiteError::assertion("No comment was listed on the file"))?;
            context.set_comment_id(comment.comment_id());
            expect::equal(comment.body(), COMMENT, "The comment body is not present")?;
            expect::equal(
                comment.author_hash(),
                context.session().identity().name(),
                "The user hash was not recorded",
            )?;
            expect::that(
                comment.author_last_name().is_some(),
                "The comment author's profile is not present",
            )?;

            let url = context
                .session()
                .url_for(&format!("/p/{}", comment.comment_id()))?;
            let node = context.fetch_document(&url).await?;
            info!(comment = node.raw(), "fetched comment node");
            expect::equal(
                node.root().field("prop1")?.as_str()?,
                PROP1,
                "prop1 should have been stored",
            )?;

            let view = context.fetch_view().await?;
            expect::equal(
                &view.comment_count()?,
                &1_i64,
                "The comment count did not increment",
            )
        })
    }

    /// The author edits the remembered comment; the count is unchanged.
    pub fn edit_comment(&mut self) -> Result<()> {
        let (runtime, context) = self.parts()?;
        runtime.block_on(async {
            let response = send_edit(context, EDITED_COMMENT).await?;
            expect::status(&response, 200, "Edit the existing comment failed")?;
            let listing = fetch_comments(context).await?;
            let body = listing.first().map(|comment| comment.body().to_owned());
            expect::equal(
                &body.as_deref(),
                &Some(EDITED_COMMENT),
                "The comment body is not present",
            )?;
            let view = context.fetch_view().await?;
            expect::equal(
                &view.comment_count()?,
                &1_i64,
                "The comment count should still be 1",
            )
        })
    }

    pub fn edit_comment_as(&mut self, text: &str, expected_status: u16) -> Result<()> {
        let (runtime, context) = self.parts()?;
        runtime.block_on(async {
            let response = send_edit(context, text).await?;
            info!(%response, "comment edit answered");
            let message = if expected_status == 200 {
                "Edit the existing comment as manager should be possible"
            } else {
                "Edit the existing comment as a non-managing user should not be possible"
            };
            expect::status(&response, expected_status, message)
        })
    }

    /// Delete the remembered comment; debug logging stays on for the rest
    /// of the scenario.
    pub fn delete_comment(&mut self) -> Result<()> {
        let (runtime, context) = self.parts()?;
        context.log().set_level(LogVerbosity::Debug);
        runtime.block_on(async {
            let path = context
                .pool_id()?
                .paths()
                .comment_delete(context.comment_id()?);
            let response = context
                .session()
                .delete(&context.session().url_for(&path)?)
                .await?;
            info!(%response, "comment delete answered");
            expect::status(
                &response,
                204,
                "Delete comment should have returned HTTP No Content",
            )?;
            let view = context.fetch_view().await?;
            expect::equal(
                &view.comment_count()?,
                &0_i64,
                "The comment count should now be 0",
            )
        })
    }
}

async fn fetch_comments(context: &ScenarioContext) -> Result<CommentListing> {
    let url = context
        .session()
        .url_for(&context.pool_id()?.paths().comments())?;
    let document = context.fetch_document(&url).await?;
    Ok(CommentListing::from_document(&document)?)
}

async fn send_comment(context: &ScenarioContext, form: FormFields) -> Result<HttpResponse> {
    let url = context
        .session()
        .url_for(&context.pool_id()?.paths().comments())?;
    context.session().post(&url, &form).await
}

async fn send_edit(context: &ScenarioContext, text: &str) -> Result<HttpResponse> {
    let form = FormFields::new()
        .field("comment", text)
        .field("commentId", context.comment_id()?);
    send_comment(context, form).await
}
