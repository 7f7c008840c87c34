use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{error, info};

use crate::models::notification::Notification;
use crate::AppState;

pub struct Sweeper {
    state: Arc<AppState>,
}

#[derive(Debug, sqlx::FromRow)]
struct SweptTask {
    id: i32,
    title: String,
    assignee_id: Option<i32>,
    assigner_id: i32,
}

impl Sweeper {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    /// Полный проход обслуживания: просрочка задач + напоминания + чистка уведомлений
    pub async fn run_sweep(&self) {
        info!("🧹 Starting maintenance sweep");

        // Сначала помечаем просроченные задачи
        self.expire_overdue_tasks().await;

        // Затем рассылаем напоминания о приближающихся дедлайнах
        self.send_deadline_reminders().await;

        // В конце удаляем устаревшие уведомления
        self.purge_old_notifications().await;

        info!("✅ Maintenance sweep completed");
    }

    /// Перевод задач с истёкшим дедлайном в EXPIRED
    async fn expire_overdue_tasks(&self) {
        let expired: Vec<SweptTask> = sqlx::query_as(
            "UPDATE tasks SET status = 'EXPIRED' \
             WHERE status IN ('NEW', 'IN_PROGRESS') AND deadline < NOW() \
             RETURNING id, title, assignee_id, assigner_id",
        )
        .fetch_all(&self.state.db.pool)
        .await
        .unwrap_or_default();

        if expired.is_empty() {
            info!("⏰ No overdue tasks to expire");
            return;
        }

        info!("⏰ Found {} overdue tasks, marking as expired", expired.len());

        for task in expired {
            let mut recipients = vec![task.assigner_id];
            if let Some(assignee_id) = task.assignee_id {
                if assignee_id != task.assigner_id {
                    recipients.push(assignee_id);
                }
            }
            for user_id in recipients {
                if let Err(e) = Notification::create(
                    user_id,
                    "Задача просрочена",
                    &format!("Истёк срок выполнения задачи \"{}\"", task.title),
                    &self.state.db,
                )
                .await
                {
                    error!("Failed to create overdue notification for task {}: {:?}", task.id, e);
                }
            }
        }
    }

    /// Напоминания о приближающемся дедлайне. Флаг reminder_sent взводится
    /// только после успешной отправки, иначе попытка повторится на следующем проходе.
    async fn send_deadline_reminders(&self) {
        let due: Vec<SweptTask> = sqlx::query_as(
            "SELECT id, title, assignee_id, assigner_id FROM tasks \
             WHERE notification_deadline IS NOT NULL \
               AND notification_deadline <= NOW() \
               AND reminder_sent = FALSE \
               AND status IN ('NEW', 'IN_PROGRESS')",
        )
        .fetch_all(&self.state.db.pool)
        .await
        .unwrap_or_default();

        if due.is_empty() {
            info!("🔔 No deadline reminders due");
            return;
        }

        info!("🔔 Sending {} deadline reminders", due.len());

        for task in due {
            // Напоминание уходит исполнителю, без исполнителя постановщику
            let recipient = task.assignee_id.unwrap_or(task.assigner_id);
            let created = Notification::create(
                recipient,
                "Приближается дедлайн",
                &format!("Подходит срок выполнения задачи \"{}\"", task.title),
                &self.state.db,
            )
            .await;

            match created {
                Ok(_) => {
                    let marked = sqlx::query("UPDATE tasks SET reminder_sent = TRUE WHERE id = $1")
                        .bind(task.id)
                        .execute(&self.state.db.pool)
                        .await;
                    if let Err(e) = marked {
                        error!("Failed to mark reminder sent for task {}: {:?}", task.id, e);
                    }
                }
                Err(e) => {
                    error!("Failed to send reminder for task {}: {:?}", task.id, e);
                }
            }
        }
    }

    /// Удаление уведомлений старше настроенного срока хранения
    async fn purge_old_notifications(&self) {
        let retention_days = self.state.config.sweeper.notification_retention_days;
        let cutoff = Utc::now().naive_utc() - Duration::days(retention_days);

        match Notification::delete_sent_before(cutoff, &self.state.db).await {
            Ok(0) => {}
            Ok(purged) => info!("🗑️ Purged {} notifications older than {} days", purged, retention_days),
            Err(e) => error!("Failed to purge old notifications: {:?}", e),
        }
    }
}
