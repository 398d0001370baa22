//! Application context for one user: catalog, stores and the relay.
//!
//! User actions arrive as `Command`s and go through a single dispatch
//! table. `dispatch` borrows the session mutably, so a session has at most
//! one relay call in flight and transcript order is call-issue order.

use std::sync::Arc;

use super::catalog::{routine_prompt, Catalog, Product, ProductId};
use super::conversation::ConversationStore;
use super::reply::{interpret_reply, ReplyOutcome};
use super::selection::SelectionStore;
use super::storage::{StateStorage, StorageError};
use super::transport::RelayTransport;
use crate::models::{Message, RelayRequest, Role};

pub const EMPTY_SELECTION_NOTICE: &str =
    "Please select at least one product before generating a routine.";
pub const ROUTINE_DISPLAY_TEXT: &str = "Generate routine for selected products.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    SelectCategory(String),
    ToggleProduct(ProductId),
    RemoveProduct(ProductId),
    ShowDetails(ProductId),
    SendChat(String),
    GenerateRoutine,
}

/// One line of the chat window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayLine {
    pub role: Role,
    pub text: String,
}

impl DisplayLine {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
        }
    }

    pub fn render(&self) -> String {
        let prefix = match self.role {
            Role::User => "You: ",
            Role::Assistant => "Bot: ",
            Role::System => "",
        };
        format!("{}{}", prefix, self.text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Products to show for the current category, plus the selection
    Products {
        visible: Vec<Product>,
        selected: Vec<ProductId>,
    },
    Details(Product),
    /// Lines to append to the chat window
    Chat(Vec<DisplayLine>),
    Ignored,
}

pub struct Session {
    catalog: Catalog,
    conversation: ConversationStore,
    selection: SelectionStore,
    category: String,
    transport: Arc<dyn RelayTransport>,
}

impl Session {
    /// Restore persisted conversation and selection from `storage`
    pub fn restore(
        catalog: Catalog,
        storage: Arc<dyn StateStorage>,
        transport: Arc<dyn RelayTransport>,
    ) -> Self {
        Self {
            catalog,
            conversation: ConversationStore::restore(storage.clone()),
            selection: SelectionStore::restore(storage),
            category: String::new(),
            transport,
        }
    }

    pub async fn dispatch(&mut self, command: Command) -> Result<Outcome, StorageError> {
        match command {
            Command::SelectCategory(category) => {
                self.category = category;
                Ok(self.products_view())
            }
            Command::ToggleProduct(id) => {
                if self.catalog.find(id).is_none() {
                    return Ok(Outcome::Ignored);
                }
                self.selection.toggle(id)?;
                Ok(self.products_view())
            }
            Command::RemoveProduct(id) => {
                self.selection.remove(id)?;
                Ok(self.products_view())
            }
            Command::ShowDetails(id) => Ok(self
                .catalog
                .find(id)
                .cloned()
                .map(Outcome::Details)
                .unwrap_or(Outcome::Ignored)),
            Command::SendChat(text) => {
                let text = text.trim();
                if text.is_empty() {
                    return Ok(Outcome::Ignored);
                }
                self.converse(text.to_string(), text.to_string()).await
            }
            Command::GenerateRoutine => {
                let products = self.catalog.resolve(self.selection.ids());
                if products.is_empty() {
                    return Ok(Outcome::Chat(vec![DisplayLine::new(
                        Role::Assistant,
                        EMPTY_SELECTION_NOTICE,
                    )]));
                }
                let prompt = routine_prompt(&products);
                self.converse(prompt, ROUTINE_DISPLAY_TEXT.to_string()).await
            }
        }
    }

    /// Chat window contents rebuilt from the persisted transcript
    pub fn history(&self) -> Vec<DisplayLine> {
        self.conversation
            .current_transcript()
            .iter()
            .map(|m| DisplayLine::new(m.role, m.content.clone()))
            .collect()
    }

    pub fn transcript(&self) -> &[Message] {
        self.conversation.current_transcript()
    }

    pub fn selected(&self) -> Vec<&Product> {
        self.catalog.resolve(self.selection.ids())
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    fn products_view(&self) -> Outcome {
        Outcome::Products {
            visible: self
                .catalog
                .by_category(&self.category)
                .into_iter()
                .cloned()
                .collect(),
            selected: self.selection.ids().to_vec(),
        }
    }

    /// Persist the user turn, relay the full transcript, then persist the
    /// assistant turn. Failures are shown but never written to the transcript.
    async fn converse(&mut self, content: String, shown: String) -> Result<Outcome, StorageError> {
        self.conversation.append(Message::user(content))?;
        let mut lines = vec![DisplayLine::new(Role::User, shown)];

        let request = RelayRequest {
            messages: self.conversation.current_transcript().to_vec(),
        };

        let outcome = match self.transport.send(&request).await {
            Ok(reply) => interpret_reply(&reply),
            Err(err) => ReplyOutcome::Failure(format!("Network error: {}", err)),
        };

        match outcome {
            ReplyOutcome::Assistant(text) | ReplyOutcome::Refusal(text) => {
                self.conversation.append(Message::assistant(text.clone()))?;
                lines.push(DisplayLine::new(Role::Assistant, text));
            }
            ReplyOutcome::Failure(text) => {
                tracing::warn!(detail = %text, "relay call failed");
                lines.push(DisplayLine::new(Role::Assistant, text));
            }
        }

        Ok(Outcome::Chat(lines))
    }
}
