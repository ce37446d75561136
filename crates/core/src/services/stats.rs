//! Admin dashboard aggregation.

use chrono::{DateTime, Datelike, TimeZone, Utc};
use salonkit_common::AppResult;
use salonkit_db::entities::order;
use salonkit_db::repositories::{
    ContactMessageRepository, OrderRepository, PhotoRepository, UserRepository,
};
use salonkit_db::types::{MessageStatus, OrderStatus};
use serde::Serialize;

/// Month-over-month growth percentage.
///
/// Defined as 0 when both values are zero, 100 when there was no previous
/// activity at all, and the rounded relative change otherwise.
#[must_use]
pub fn growth(current: i64, previous: i64) -> i64 {
    if previous == 0 {
        if current == 0 { 0 } else { 100 }
    } else {
        (((current - previous) as f64 / previous as f64) * 100.0).round() as i64
    }
}

/// The admin dashboard headline numbers.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_revenue: i64,
    pub monthly_revenue: i64,
    pub revenue_growth: i64,
    pub total_orders: u64,
    pub pending_orders: u64,
    pub processing_orders: u64,
    pub completed_orders: u64,
    pub cancelled_orders: u64,
    pub monthly_orders: u64,
    pub order_growth: i64,
    pub total_users: u64,
    pub monthly_users: u64,
    pub user_growth: i64,
    pub total_photos: u64,
    pub unread_messages: u64,
}

/// User-table numbers for the admin user list.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub total_users: u64,
    pub new_this_month: u64,
    pub new_previous_month: u64,
    pub user_growth: i64,
}

/// Contact inbox numbers.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageStats {
    pub total: u64,
    pub unread: u64,
    pub read: u64,
    pub replied: u64,
    pub archived: u64,
}

/// Read-only aggregation service behind the admin dashboards.
#[derive(Clone)]
pub struct StatsService {
    order_repo: OrderRepository,
    user_repo: UserRepository,
    photo_repo: PhotoRepository,
    contact_repo: ContactMessageRepository,
}

impl StatsService {
    /// Create a new stats service.
    #[must_use]
    pub const fn new(
        order_repo: OrderRepository,
        user_repo: UserRepository,
        photo_repo: PhotoRepository,
        contact_repo: ContactMessageRepository,
    ) -> Self {
        Self {
            order_repo,
            user_repo,
            photo_repo,
            contact_repo,
        }
    }

    /// Compute the dashboard in one concurrent batch.
    ///
    /// All queries run via `try_join!`; a single failure fails the whole
    /// dashboard rather than rendering partial numbers.
    pub async fn dashboard_stats(&self) -> AppResult<DashboardStats> {
        let now = Utc::now();
        let (month_start, prev_month_start) = month_window(now);

        let (
            total_revenue,
            monthly_revenue,
            previous_revenue,
            total_orders,
            pending_orders,
            processing_orders,
            completed_orders,
            cancelled_orders,
            monthly_orders,
            previous_orders,
            total_users,
            monthly_users,
            previous_users,
            total_photos,
            unread_messages,
        ) = tokio::try_join!(
            self.order_repo.sum_completed_revenue(),
            self.order_repo
                .sum_completed_revenue_between(month_start, now),
            self.order_repo
                .sum_completed_revenue_between(prev_month_start, month_start),
            self.order_repo.count(),
            self.order_repo
                .count_by_status(OrderStatus::Pending.as_str()),
            self.order_repo
                .count_by_status(OrderStatus::Processing.as_str()),
            self.order_repo
                .count_by_status(OrderStatus::Completed.as_str()),
            self.order_repo
                .count_by_status(OrderStatus::Cancelled.as_str()),
            self.order_repo.count_created_between(month_start, now),
            self.order_repo
                .count_created_between(prev_month_start, month_start),
            self.user_repo.count(),
            self.user_repo.count_created_between(month_start, now),
            self.user_repo
                .count_created_between(prev_month_start, month_start),
            self.photo_repo.count(),
            self.contact_repo
                .count_by_status(MessageStatus::Unread.as_str()),
        )?;

        Ok(DashboardStats {
            total_revenue,
            monthly_revenue,
            revenue_growth: growth(monthly_revenue, previous_revenue),
            total_orders,
            pending_orders,
            processing_orders,
            completed_orders,
            cancelled_orders,
            monthly_orders,
            order_growth: growth(monthly_orders as i64, previous_orders as i64),
            total_users,
            monthly_users,
            user_growth: growth(monthly_users as i64, previous_users as i64),
            total_photos,
            unread_messages,
        })
    }

    /// The most recently created orders.
    pub async fn recent_orders(&self, limit: u64) -> AppResult<Vec<order::Model>> {
        self.order_repo.find_recent(limit).await
    }

    /// User-table numbers.
    pub async fn user_stats(&self) -> AppResult<UserStats> {
        let now = Utc::now();
        let (month_start, prev_month_start) = month_window(now);

        let (total_users, new_this_month, new_previous_month) = tokio::try_join!(
            self.user_repo.count(),
            self.user_repo.count_created_between(month_start, now),
            self.user_repo
                .count_created_between(prev_month_start, month_start),
        )?;

        Ok(UserStats {
            total_users,
            new_this_month,
            new_previous_month,
            user_growth: growth(new_this_month as i64, new_previous_month as i64),
        })
    }

    /// Contact inbox numbers.
    pub async fn message_stats(&self) -> AppResult<MessageStats> {
        let (total, unread, read, replied, archived) = tokio::try_join!(
            self.contact_repo.count(),
            self.contact_repo
                .count_by_status(MessageStatus::Unread.as_str()),
            self.contact_repo
                .count_by_status(MessageStatus::Read.as_str()),
            self.contact_repo
                .count_by_status(MessageStatus::Replied.as_str()),
            self.contact_repo
                .count_by_status(MessageStatus::Archived.as_str()),
        )?;

        Ok(MessageStats {
            total,
            unread,
            read,
            replied,
            archived,
        })
    }
}

/// Start of the current month and start of the previous month.
fn month_window(now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let month_start = Utc
        .with_ymd_and_hms(now.year(), now.month(), 1, 0, 0, 0)
        .single()
        .unwrap_or(now);

    let (prev_year, prev_month) = if now.month() == 1 {
        (now.year() - 1, 12)
    } else {
        (now.year(), now.month() - 1)
    };
    let prev_month_start = Utc
        .with_ymd_and_hms(prev_year, prev_month, 1, 0, 0, 0)
        .single()
        .unwrap_or(month_start);

    (month_start, prev_month_start)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_growth_both_zero() {
        assert_eq!(growth(0, 0), 0);
    }

    #[test]
    fn test_growth_from_nothing_is_full() {
        assert_eq!(growth(5, 0), 100);
        assert_eq!(growth(1, 0), 100);
    }

    #[test]
    fn test_growth_halved() {
        assert_eq!(growth(50, 100), -50);
    }

    #[test]
    fn test_growth_up_by_half() {
        assert_eq!(growth(150, 100), 50);
    }

    #[test]
    fn test_growth_rounds() {
        // 1/3 of the way up: 33.33... rounds to 33.
        assert_eq!(growth(4, 3), 33);
        // Two thirds: 66.66... rounds to 67.
        assert_eq!(growth(5, 3), 67);
    }

    #[test]
    fn test_month_window_mid_year() {
        let now = Utc.with_ymd_and_hms(2026, 8, 27, 14, 30, 0).unwrap();
        let (month_start, prev_month_start) = month_window(now);

        assert_eq!(month_start, Utc.with_ymd_and_hms(2026, 8, 1, 0, 0, 0).unwrap());
        assert_eq!(
            prev_month_start,
            Utc.with_ymd_and_hms(2026, 7, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_month_window_january_wraps_year() {
        let now = Utc.with_ymd_and_hms(2026, 1, 15, 0, 0, 0).unwrap();
        let (month_start, prev_month_start) = month_window(now);

        assert_eq!(month_start, Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(
            prev_month_start,
            Utc.with_ymd_and_hms(2025, 12, 1, 0, 0, 0).unwrap()
        );
    }
}
