//! In-memory integration tests for projects, invitations, and roles.

use super::helpers::{Engine, engine, person};
use atelier::ErrorKind;
use atelier::config::EngineConfig;
use atelier::team::{
    domain::{INVITATION_TTL_DAYS, InvitationRole, InvitationStatus, MemberStatus, Role},
    services::TeamServiceError,
};
use chrono::TimeDelta;
use mockable::Clock;
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn invitation_round_trip_grants_invited_role(engine: Engine) -> Result<(), eyre::Report> {
    let owner = person("owner", "olive@studio.example", "Olive");
    let member = person("member", "mo@studio.example", "Mo");
    let project = engine.project(&owner, "Studio site").await;
    engine
        .membership
        .add_member(owner.user_id(), project.id(), &member, Role::Member)
        .await?;

    let by_member = engine
        .invitations
        .invite(&member, project.id(), "a@b.com", InvitationRole::Viewer)
        .await;
    eyre::ensure!(
        by_member.as_ref().map_err(TeamServiceError::kind).err() == Some(ErrorKind::Forbidden),
        "member invitation should be forbidden, got {by_member:?}"
    );

    let invitation = engine
        .invitations
        .invite(&owner, project.id(), "a@b.com", InvitationRole::Admin)
        .await?;
    eyre::ensure!(
        invitation.expires_at() == engine.clock.utc() + TimeDelta::days(INVITATION_TTL_DAYS),
        "invitation should expire seven days out"
    );

    let wrong = person("someone", "x@y.com", "Xavier");
    let mismatch = engine.invitations.accept(invitation.id(), &wrong).await;
    eyre::ensure!(
        mismatch.as_ref().map_err(TeamServiceError::kind).err() == Some(ErrorKind::EmailMismatch),
        "mismatched email should be rejected, got {mismatch:?}"
    );

    let invitee = person("invitee", "a@b.com", "Avery");
    let joined = engine.invitations.accept(invitation.id(), &invitee).await?;
    eyre::ensure!(joined.role() == Role::Admin, "invitee should join as admin");
    eyre::ensure!(joined.status() == MemberStatus::Active, "new member is active");

    let stored = engine
        .invitations
        .find_invitation(invitation.id())
        .await?
        .ok_or_else(|| eyre::eyre!("invitation should still exist"))?;
    eyre::ensure!(
        stored.status() == InvitationStatus::Accepted,
        "invitation should be accepted"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn accepting_twice_leaves_one_membership(engine: Engine) -> Result<(), eyre::Report> {
    let owner = person("owner", "olive@studio.example", "Olive");
    let invitee = person("invitee", "ivy@studio.example", "Ivy");
    let project = engine.project(&owner, "Studio site").await;
    let invitation = engine
        .invitations
        .invite(&owner, project.id(), invitee.email().as_str(), InvitationRole::Member)
        .await?;

    engine.invitations.accept(invitation.id(), &invitee).await?;
    let second = engine.invitations.accept(invitation.id(), &invitee).await;

    eyre::ensure!(
        second.as_ref().map_err(TeamServiceError::kind).err() == Some(ErrorKind::InvalidState),
        "second acceptance should be invalid, got {second:?}"
    );
    let invitee_rows = engine
        .membership
        .list_active(project.id())
        .await?
        .into_iter()
        .filter(|member| member.user_id() == invitee.user_id())
        .count();
    eyre::ensure!(invitee_rows == 1, "expected one membership, found {invitee_rows}");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn inviting_existing_member_creates_no_invitation(
    engine: Engine,
) -> Result<(), eyre::Report> {
    let owner = person("owner", "olive@studio.example", "Olive");
    let member = person("member", "mo@studio.example", "Mo");
    let project = engine.project(&owner, "Studio site").await;
    engine
        .membership
        .add_member(owner.user_id(), project.id(), &member, Role::Member)
        .await?;

    let result = engine
        .invitations
        .invite(&owner, project.id(), "MO@studio.example", InvitationRole::Admin)
        .await;

    eyre::ensure!(
        matches!(result, Err(TeamServiceError::AlreadyMember { .. })),
        "expected AlreadyMember, got {result:?}"
    );
    let pending = engine
        .invitations
        .list_pending_for_email("mo@studio.example")
        .await?;
    eyre::ensure!(pending.is_empty(), "no invitation should be stored");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn expired_invitation_drops_out_of_pending_list(engine: Engine) -> Result<(), eyre::Report> {
    let owner = person("owner", "olive@studio.example", "Olive");
    let project = engine.project(&owner, "Studio site").await;
    let other = engine.project(&owner, "Studio app").await;
    engine
        .invitations
        .invite(&owner, project.id(), "pat@studio.example", InvitationRole::Viewer)
        .await?;
    engine.clock.advance(TimeDelta::days(3));
    let fresh = engine
        .invitations
        .invite(&owner, other.id(), "pat@studio.example", InvitationRole::Member)
        .await?;

    engine.clock.advance(TimeDelta::days(5));
    let pending = engine
        .invitations
        .list_pending_for_email("pat@studio.example")
        .await?;

    let ids: Vec<_> = pending.iter().map(|invitation| invitation.id()).collect();
    eyre::ensure!(ids == vec![fresh.id()], "only the fresh invitation remains");
    Ok(())
}

#[rstest]
#[case(Role::Owner)]
#[case(Role::Admin)]
#[case(Role::Member)]
#[case(Role::Viewer)]
#[tokio::test(flavor = "multi_thread")]
async fn members_never_change_roles(engine: Engine, #[case] requested: Role) -> Result<(), eyre::Report> {
    let owner = person("owner", "olive@studio.example", "Olive");
    let member = person("member", "mo@studio.example", "Mo");
    let viewer = person("viewer", "vi@studio.example", "Vi");
    let project = engine.project(&owner, "Studio site").await;
    engine
        .membership
        .add_member(owner.user_id(), project.id(), &member, Role::Member)
        .await?;
    let target = engine
        .membership
        .add_member(owner.user_id(), project.id(), &viewer, Role::Viewer)
        .await?;

    let result = engine
        .membership
        .update_role(member.user_id(), project.id(), target.id(), requested)
        .await;

    eyre::ensure!(
        result.as_ref().map_err(TeamServiceError::kind).err() == Some(ErrorKind::Forbidden),
        "member role change should be forbidden, got {result:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn configured_limits_apply_to_project_names() -> Result<(), eyre::Report> {
    let config = EngineConfig::from_json_str(r#"{"team": {"max_project_name_length": 4}}"#)?;
    let engine = Engine::with_config(&config);
    let owner = person("owner", "olive@studio.example", "Olive");

    let result = engine.membership.create_project(&owner, "Studio").await;

    eyre::ensure!(
        result.as_ref().map_err(TeamServiceError::kind).err() == Some(ErrorKind::Validation),
        "long project name should fail validation, got {result:?}"
    );
    Ok(())
}
