//! Membership grants and what each member may then do.

use pooltest::{
    Result,
    content::{Grants, MemberChanges},
    expect,
    session::FormFields,
};
use tracing::info;

use crate::world::ContentWorld;

/// Role a fixture user is granted on the item under test.
#[derive(Clone, Copy, Debug)]
pub enum Role {
    Viewer,
    Editor,
    Manager,
}

/// Privilege level expected in the item's ACL.
#[derive(Clone, Copy, Debug)]
pub enum Access {
    Read,
    ReadWrite,
    Full,
}

impl ContentWorld {
    pub fn grant(&mut self, user: &str, role: Role) -> Result<()> {
        let (runtime, context) = self.parts()?;
        let principal = context.user(user)?.name().to_owned();
        let changes = match role {
            Role::Viewer => MemberChanges::new().add_viewer(&principal),
            Role::Editor => MemberChanges::new().add_editor(&principal),
            Role::Manager => MemberChanges::new().add_manager(&principal),
        };
        runtime.block_on(async {
            let response = context
                .files()
                .manage_members(context.pool_id()?, &changes)
                .await?;
            expect::status(
                &response,
                200,
                &format!("Setting {role:?} permission for {principal} failed"),
            )
        })
    }

    pub fn check_access(&mut self, user: &str, access: Access) -> Result<()> {
        let (runtime, context) = self.parts()?;
        let principal = context.user(user)?.name().to_owned();
        runtime.block_on(async {
            let url = context.session().url_for(&context.pool_id()?.paths().acl())?;
            let acl = context.fetch_document(&url).await?;
            info!(acl = acl.raw(), "fetched acl");
            let grants = Grants::from_acl(&acl, &principal)?;
            let granted = match access {
                Access::Read => grants.is_read_only(),
                Access::ReadWrite => grants.is_read_write(),
                Access::Full => grants.has_full_control(),
            };
            expect::that(
                granted,
                format!("{principal}'s permissions are incorrect: {grants}"),
            )
        })
    }

    pub fn read_file(&mut self, expected_status: u16) -> Result<()> {
        let (runtime, context) = self.parts()?;
        runtime.block_on(async {
            let response = context.session().get(context.file_url()?).await?;
            expect::status(&response, expected_status, "Reading the file")
        })
    }

    /// Set a property as the acting user and check it persisted.
    pub fn write_file(&mut self) -> Result<()> {
        let (runtime, context) = self.parts()?;
        runtime.block_on(async {
            let form = FormFields::new().field("otheruserprop", "value");
            let response = context.session().post(context.file_url()?, &form).await?;
            expect::status(&response, 200, "User should be able to write to file")?;
            let view = context.fetch_view().await?;
            expect::equal(
                &view.property("otheruserprop")?,
                &Some("value"),
                "User's edit did not persist",
            )
        })
    }

    pub fn delete_file(&mut self, expected_status: u16) -> Result<()> {
        let (runtime, context) = self.parts()?;
        runtime.block_on(async {
            let form = FormFields::new().field(":operation", "delete");
            let response = context.session().post(context.file_url()?, &form).await?;
            let message = if expected_status == 200 {
                "User should be able to delete file"
            } else {
                "User should not be able to delete file"
            };
            expect::status(&response, expected_status, message)
        })
    }

    pub fn view_acl(&mut self, expected_status: u16) -> Result<()> {
        let (runtime, context) = self.parts()?;
        runtime.block_on(async {
            let url = context.session().url_for(&context.pool_id()?.paths().acl())?;
            let response = context.session().get(&url).await?;
            let message = if expected_status == 200 {
                "User should be able to see acl"
            } else {
                "User should not be able to see acl"
            };
            expect::status(&response, expected_status, message)
        })
    }
}
