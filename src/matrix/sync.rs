//! Sync loop of the Matrix client.
//!
//! [`MatrixSync::sync`] catches up on the invites received while offline,
//! then forwards every new text message and reaction of joined rooms to the
//! bot callbacks.

use anyhow::Result;
use std::sync::Arc;

use log::{debug, error, info, warn};
use matrix_sdk::{
    Client, LoopCtrl, Room, RoomState,
    config::SyncSettings,
    ruma::{
        api::client::filter::FilterDefinition,
        events::{
            reaction::OriginalSyncReactionEvent,
            room::{
                member::StrippedRoomMemberEvent,
                message::{MessageType, OriginalSyncRoomMessageEvent},
            },
        },
    },
};
use tokio::time::{Duration, sleep};

use crate::matrix::session::SessionFile;

/// Delay before retrying a failed initial sync.
const INITIAL_SYNC_RETRY: Duration = Duration::from_secs(5);

/// Drives the sync loop of an authenticated client.
pub struct MatrixSync {
    client: Client,
    session_file: SessionFile,
}

impl MatrixSync {
    pub fn new(client: &Client, session_file: &SessionFile) -> Self {
        MatrixSync {
            client: client.to_owned(),
            session_file: session_file.to_owned(),
        }
    }

    /// Syncs forever, invoking the callbacks for new events.
    ///
    /// * `on_message` receives `(body, room_id, sender_id, event_id)` for each
    ///   text message.
    /// * `on_reaction` receives `(room_id, sender_id, target_event_id, key)`
    ///   for each reaction.
    ///
    /// Events older than the first sync are not forwarded. Failing to persist
    /// a sync token is logged and does not stop the loop.
    pub async fn sync<M, R>(&self, on_message: M, on_reaction: R) -> Result<()>
    where
        M: Fn(String, String, String, String) + Send + Sync + 'static,
        R: Fn(String, String, String, String) + Send + Sync + 'static,
    {
        info!("start syncing");

        self.client.add_event_handler(auto_join_rooms);

        // Lazy-load room members, the bot never lists them
        let filter = FilterDefinition::with_lazy_loading();
        let mut sync_settings = SyncSettings::default().filter(filter.into());

        if let Some(sync_token) = self.session_file.sync_token() {
            sync_settings = sync_settings.token(sync_token);
        }

        // Catch up on invites received while offline, without handling old commands
        let response = loop {
            match self.client.sync_once(sync_settings.clone()).await {
                Ok(response) => break response,
                Err(err) => {
                    error!("an error occurred during initial sync: {err}");
                    error!("trying again in {}s", INITIAL_SYNC_RETRY.as_secs());
                    sleep(INITIAL_SYNC_RETRY).await;
                }
            }
        };
        if let Err(err) = self
            .session_file
            .save_sync_token(response.next_batch.clone())
            .await
        {
            error!("failed to persist sync token: {:?}", err);
        }

        let on_message = Arc::new(on_message);
        self.client.add_event_handler({
            let on_message = Arc::clone(&on_message);
            move |event: OriginalSyncRoomMessageEvent, room: Room| async move {
                on_room_message(event, room, &on_message).await
            }
        });

        let on_reaction = Arc::new(on_reaction);
        self.client.add_event_handler({
            let on_reaction = Arc::clone(&on_reaction);
            move |event: OriginalSyncReactionEvent, room: Room| async move {
                on_room_reaction(event, room, &on_reaction).await
            }
        });

        sync_settings = sync_settings.token(response.next_batch);

        self.client
            .sync_with_result_callback(sync_settings, |sync_result| async move {
                let response = sync_result?;

                if let Err(err) = self.session_file.save_sync_token(response.next_batch).await {
                    error!("failed to persist sync token: {:?}", err);
                }

                Ok(LoopCtrl::Continue)
            })
            .await?;

        Ok(())
    }
}

/// Joins the rooms the bot is invited to.
///
/// Synapse may send the invite before the room can be joined, so failed joins
/// are retried with an exponential backoff, see
/// <https://github.com/matrix-org/synapse/issues/4345>.
async fn auto_join_rooms(room_member: StrippedRoomMemberEvent, client: Client, room: Room) {
    let Some(user_id) = client.user_id() else {
        warn!("could not get user id from client");
        return;
    };

    if room_member.state_key != user_id {
        return;
    }

    tokio::spawn(async move {
        info!("auto joining room {}", room.room_id());
        let mut delay = 2;

        while let Err(err) = room.join().await {
            error!(
                "failed to join room {} ({err:?}), retrying in {delay}s",
                room.room_id()
            );

            sleep(Duration::from_secs(delay)).await;
            delay *= 2;

            if delay > 3600 {
                error!("can't join room {} ({err:?})", room.room_id());
                return;
            }
        }
        info!("successfully joined room {}", room.room_id());
    });
}

/// Forwards text messages of joined rooms.
async fn on_room_message<F>(event: OriginalSyncRoomMessageEvent, room: Room, on_message: &Arc<F>)
where
    F: Fn(String, String, String, String) + Send + Sync + 'static,
{
    if room.state() != RoomState::Joined {
        return;
    }

    let MessageType::Text(text_content) = event.content.msgtype else {
        return;
    };

    on_message(
        text_content.body,
        room.room_id().to_string(),
        event.sender.to_string(),
        event.event_id.to_string(),
    );
}

/// Forwards reactions of joined rooms, with the event they annotate.
async fn on_room_reaction<F>(event: OriginalSyncReactionEvent, room: Room, on_reaction: &Arc<F>)
where
    F: Fn(String, String, String, String) + Send + Sync + 'static,
{
    if room.state() != RoomState::Joined {
        return;
    }

    let annotation = event.content.relates_to;
    debug!(
        "reaction {} from {} on {}",
        annotation.key, event.sender, annotation.event_id
    );

    on_reaction(
        room.room_id().to_string(),
        event.sender.to_string(),
        annotation.event_id.to_string(),
        annotation.key,
    );
}
