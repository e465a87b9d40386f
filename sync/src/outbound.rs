//! Outbound sync: Ticket Store changes are reconciled back into chat threads.
//!
//! Two independent long-lived subscriptions: staff-message delivery and
//! ticket reconciliation. Each handler failure is logged and isolated to its
//! event; the loops only end when the feed closes at process shutdown.

use std::sync::Arc;

use tbot_core::{ChatGateway, ClosedBy, Result, TbotError, ThreadNotice};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::broadcast::Receiver;
use tracing::{error, info, warn};

use storage::{
    ChangeKind, StaffMessageChange, TicketChange, TicketMessageRecord, TicketQuery, TicketRecord,
    TicketStore,
};

use crate::reconcile::{status_transition, ReconcileState, StatusAction};

/// Delivers dashboard-authored staff messages into their ticket threads,
/// at most once per message while the delivery flag holds.
#[derive(Clone)]
pub struct StaffMessageDelivery {
    store: TicketStore,
    gateway: Arc<dyn ChatGateway>,
}

impl StaffMessageDelivery {
    pub fn new(store: TicketStore, gateway: Arc<dyn ChatGateway>) -> Self {
        Self { store, gateway }
    }

    /// Delivers one staff message if it is still undelivered.
    ///
    /// The record is re-read first so a message that was already rendered
    /// (e.g. by the recovery scan) is skipped. If the thread cannot be
    /// resolved the error propagates and the flag stays false, so the message
    /// is never silently lost.
    pub async fn deliver(&self, message_id: &str) -> Result<()> {
        let message = self
            .store
            .messages()
            .get(message_id)
            .await
            .map_err(|e| TbotError::Store(e.to_string()))?;

        let Some(message) = message else {
            warn!(message_id = %message_id, "Staff message vanished before delivery");
            return Ok(());
        };
        if message.sent_to_discord {
            return Ok(());
        }

        let ticket = self
            .store
            .tickets()
            .get(&message.ticket_id)
            .await
            .map_err(|e| TbotError::Store(e.to_string()))?;
        let Some(ticket) = ticket else {
            warn!(
                message_id = %message.id,
                ticket_id = %message.ticket_id,
                "Staff message has no parent ticket"
            );
            return Ok(());
        };

        let thread = self
            .gateway
            .fetch_thread(ticket.server_id, ticket.thread_id)
            .await?;

        let notice = ThreadNotice::StaffReply {
            author_username: message.author_username.clone(),
            author_avatar: message.author_avatar.clone(),
            content: message.content.clone(),
            ping_user_id: message.ping_user.then_some(ticket.opener_id),
            sent_at: message.sent_at,
        };
        self.gateway.send_notice(&thread.thread, &notice).await?;

        let flipped = self
            .store
            .messages()
            .mark_delivered(&message.id)
            .await
            .map_err(|e| TbotError::Store(e.to_string()))?;
        if !flipped {
            warn!(message_id = %message.id, "Delivery flag was already set after render");
        }

        info!(
            ticket_id = %ticket.id,
            message_id = %message.id,
            "Delivered staff message to thread"
        );
        Ok(())
    }

    /// Startup outbox recovery: re-scans staff messages whose delivery intent
    /// was never completed and runs the normal delivery path for each.
    /// Per-message failures are logged and skipped. Returns how many were
    /// delivered.
    pub async fn recover(&self) -> Result<usize> {
        let pending = self
            .store
            .messages()
            .undelivered_staff()
            .await
            .map_err(|e| TbotError::Store(e.to_string()))?;

        let total = pending.len();
        let mut delivered = 0usize;
        for message in &pending {
            match self.deliver(&message.id).await {
                Ok(()) => delivered += 1,
                Err(e) => {
                    error!(
                        message_id = %message.id,
                        ticket_id = %message.ticket_id,
                        error = %e,
                        "Recovery delivery failed; will retry on next startup"
                    );
                }
            }
        }

        if total > 0 {
            info!(total, delivered, "Recovered undelivered staff messages");
        }
        Ok(delivered)
    }

    /// Consumes the staff-message subscription until the feed closes.
    pub async fn run(self, mut changes: Receiver<StaffMessageChange>) {
        loop {
            match changes.recv().await {
                Ok(change) => {
                    if let Err(e) = self.deliver(&change.message.id).await {
                        error!(
                            ticket_id = %change.ticket_id,
                            message_id = %change.message.id,
                            error = %e,
                            "Staff message delivery failed"
                        );
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    // Missed additions are picked up by the next recovery scan.
                    warn!(skipped, "Staff message subscription lagged");
                }
                Err(RecvError::Closed) => break,
            }
        }
    }
}

/// Reconciles ticket modifications into thread state: assignment notices,
/// closure/resolution/re-open notices, and the matching lock transitions.
pub struct TicketReconciler {
    store: TicketStore,
    gateway: Arc<dyn ChatGateway>,
    state: ReconcileState,
}

impl TicketReconciler {
    pub fn new(store: TicketStore, gateway: Arc<dyn ChatGateway>) -> Self {
        Self {
            store,
            gateway,
            state: ReconcileState::new(),
        }
    }

    /// Seeds the assignment map from current store state, the analogue of a
    /// change feed's initial snapshot. Returns how many tickets were seeded.
    pub async fn seed(&mut self) -> Result<usize> {
        let tickets = self
            .store
            .tickets()
            .list(&TicketQuery::default())
            .await
            .map_err(|e| TbotError::Store(e.to_string()))?;

        for ticket in &tickets {
            self.state.seed(&ticket.id, ticket.assigned_to.as_deref());
        }
        info!(count = tickets.len(), "Seeded reconciliation state");
        Ok(tickets.len())
    }

    /// Handles one ticket change event. `Added` and `Removed` only maintain
    /// the assignment map; `Modified` is reconciled against the thread.
    pub async fn handle_change(&mut self, change: &TicketChange) -> Result<()> {
        match change.kind {
            ChangeKind::Added => {
                self.state
                    .seed(&change.ticket.id, change.ticket.assigned_to.as_deref());
                Ok(())
            }
            ChangeKind::Removed => {
                self.state.forget(&change.ticket.id);
                Ok(())
            }
            ChangeKind::Modified => self.reconcile(&change.ticket).await,
        }
    }

    /// One modified event, one action: assignment edges take precedence over
    /// status transitions so a single write that changes both never renders
    /// two contradictory notices.
    async fn reconcile(&mut self, ticket: &TicketRecord) -> Result<()> {
        // Observe before any network call, so a failed render cannot replay
        // the same edge on the next unrelated event.
        let assignment_changed = self
            .state
            .observe(&ticket.id, ticket.assigned_to.as_deref());

        let thread = self
            .gateway
            .fetch_thread(ticket.server_id, ticket.thread_id)
            .await?;

        if assignment_changed {
            let (notice, audit) = match ticket.assigned_to_name.as_deref() {
                Some(name) => (
                    ThreadNotice::Assigned {
                        staff_name: name.to_string(),
                    },
                    format!("Ticket assigned to {}.", name),
                ),
                None => (ThreadNotice::Unassigned, "Ticket unassigned.".to_string()),
            };
            self.gateway.send_notice(&thread.thread, &notice).await?;
            self.append_audit(&ticket.id, audit).await?;
            info!(ticket_id = %ticket.id, assigned_to = ?ticket.assigned_to, "Rendered assignment change");
            return Ok(());
        }

        match status_transition(ticket.status, thread.locked) {
            Some(StatusAction::Close) => {
                self.gateway
                    .send_notice(
                        &thread.thread,
                        &ThreadNotice::Closed {
                            by: ClosedBy::Staff,
                        },
                    )
                    .await?;
                self.append_audit(&ticket.id, "Ticket closed by staff.".to_string())
                    .await?;
                self.gateway
                    .set_locked(&thread.thread, true, "Ticket closed by staff from the dashboard.")
                    .await?;
                info!(ticket_id = %ticket.id, "Locked thread for closed ticket");
            }
            Some(StatusAction::Resolve) => {
                self.gateway
                    .send_notice(&thread.thread, &ThreadNotice::Resolved)
                    .await?;
                self.append_audit(&ticket.id, "Ticket marked as resolved.".to_string())
                    .await?;
                info!(ticket_id = %ticket.id, "Rendered resolution notice");
            }
            Some(StatusAction::Reopen) => {
                self.gateway
                    .send_notice(&thread.thread, &ThreadNotice::Reopened)
                    .await?;
                self.append_audit(&ticket.id, "Ticket re-opened by staff.".to_string())
                    .await?;
                self.gateway
                    .set_locked(&thread.thread, false, "Ticket re-opened by staff.")
                    .await?;
                info!(ticket_id = %ticket.id, "Unlocked thread for re-opened ticket");
            }
            None => {}
        }

        Ok(())
    }

    async fn append_audit(&self, ticket_id: &str, content: String) -> Result<()> {
        let event = TicketMessageRecord::event(ticket_id, content);
        self.store
            .messages()
            .append(&event)
            .await
            .map_err(|e| TbotError::Store(e.to_string()))
    }

    /// Consumes the ticket subscription until the feed closes.
    pub async fn run(mut self, mut changes: Receiver<TicketChange>) {
        loop {
            match changes.recv().await {
                Ok(change) => {
                    if let Err(e) = self.handle_change(&change).await {
                        error!(
                            ticket_id = %change.ticket.id,
                            thread_id = change.ticket.thread_id,
                            error = %e,
                            "Ticket reconciliation failed"
                        );
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Ticket subscription lagged");
                }
                Err(RecvError::Closed) => break,
            }
        }
    }
}

/// The outbound half of the sync core: owns both subscriptions for the life
/// of the process.
pub struct OutboundSync {
    delivery: StaffMessageDelivery,
    reconciler: TicketReconciler,
    store: TicketStore,
}

impl OutboundSync {
    pub fn new(store: TicketStore, gateway: Arc<dyn ChatGateway>) -> Self {
        Self {
            delivery: StaffMessageDelivery::new(store.clone(), gateway.clone()),
            reconciler: TicketReconciler::new(store.clone(), gateway),
            store,
        }
    }

    /// Seeds reconciliation state, runs outbox recovery, then consumes both
    /// subscriptions until shutdown.
    pub async fn run(mut self) -> Result<()> {
        // Subscribe before the scans so writes landing in between are not lost.
        let staff_rx = self.store.subscribe_staff_messages();
        let tickets_rx = self.store.subscribe_tickets();

        self.reconciler.seed().await?;
        self.delivery.recover().await?;

        let delivery_task = tokio::spawn(self.delivery.run(staff_rx));
        let reconcile_task = tokio::spawn(self.reconciler.run(tickets_rx));

        let _ = tokio::join!(delivery_task, reconcile_task);
        Ok(())
    }
}
