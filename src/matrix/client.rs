//! Matrix client wrapper used by the bot.
//!
//! [`MatrixClient`] owns the logged in SDK client. It replies to commands,
//! reacts to messages and runs the sync loop.

use log::{error, info};
use matrix_sdk::{
    Client,
    ruma::{
        EventId, OwnedEventId, RoomId, UserId,
        events::{
            MessageLikeEventContent,
            reaction::ReactionEventContent,
            relation::Annotation,
            room::message::{AddMentions, ForwardThread, ReplyMetadata, RoomMessageEventContent},
        },
    },
};
use std::path::Path;

use crate::{
    matrix::{
        UserCredentials, login::setup_client, reactions::Reactor, session::SessionFile,
        sync::MatrixSync,
    },
    turns::{MessageRef, RenderSink},
};

/// Display name of the bot account.
const DISPLAY_NAME: &str = "Sweepbot";

pub struct MatrixClient {
    matrix_sync: MatrixSync,
    client: Client,
}

impl MatrixClient {
    /// Logs in, or restores the login saved in `data_path`.
    ///
    /// # Errors
    ///
    /// Fails if the homeserver rejects the login or the store cannot be opened.
    pub async fn new(user_credentials: &UserCredentials, data_path: &Path) -> anyhow::Result<Self> {
        let session_file = SessionFile::load(data_path).await;

        let client = match setup_client(user_credentials, &session_file).await {
            Ok(client) => client,
            Err(err) => {
                error!("failed to setup matrix client: {:?}", err);
                return Err(err.context("failed to setup matrix client"));
            }
        };

        client.account().set_display_name(Some(DISPLAY_NAME)).await?;

        let matrix_sync = MatrixSync::new(&client, &session_file);

        Ok(MatrixClient {
            matrix_sync,
            client,
        })
    }

    /// Runs the sync loop, see [`MatrixSync::sync`] for the callbacks.
    pub async fn sync<M, R>(&self, on_message: M, on_reaction: R) -> anyhow::Result<()>
    where
        M: Fn(String, String, String, String) + Send + Sync + 'static,
        R: Fn(String, String, String, String) + Send + Sync + 'static,
    {
        match self.matrix_sync.sync(on_message, on_reaction).await {
            Ok(_) => info!("matrix sync ended successfully"),
            Err(e) => error!("matrix sync ended with error: {:?}", e),
        }

        Ok(())
    }

    /// Replies to the message `event_id` of `sender_id`, rendering `body` as Markdown.
    pub async fn send_reply(&self, room_id: &str, sender_id: &str, event_id: &str, body: &str) {
        let (sender, event) = match (UserId::parse(sender_id), EventId::parse(event_id)) {
            (Ok(sender), Ok(event)) => (sender, event),
            _ => {
                error!("cannot reply to {} from {}", event_id, sender_id);
                return;
            }
        };

        let content = RoomMessageEventContent::text_markdown(body).make_reply_to(
            ReplyMetadata::new(&event, &sender, None),
            ForwardThread::No,
            AddMentions::No,
        );

        self.send_content(room_id, content).await;
    }

    async fn send_content(&self, room_id: &str, content: impl MessageLikeEventContent) {
        let Ok(room_id) = RoomId::parse(room_id) else {
            error!("invalid room id {}", room_id);
            return;
        };

        let Some(room) = self.client.get_room(&room_id) else {
            error!("unknown room {}", room_id);
            return;
        };

        if let Err(e) = room.send(content).await {
            error!("failed to send event: {:?}", e);
        }
    }
}

impl RenderSink for MatrixClient {
    async fn send(&self, destination: &MessageRef, text: &str) {
        self.send_reply(
            &destination.room_id,
            &destination.sender_id,
            &destination.event_id,
            text,
        )
        .await;
    }
}

impl Reactor for MatrixClient {
    async fn react(&self, room_id: &str, event_id: &str, key: &str) {
        let event_id: OwnedEventId = match EventId::parse(event_id) {
            Ok(event_id) => event_id,
            Err(e) => {
                error!("cannot react to {}: {:?}", event_id, e);
                return;
            }
        };

        let content = ReactionEventContent::new(Annotation::new(event_id, key.to_string()));
        self.send_content(room_id, content).await;
    }
}
