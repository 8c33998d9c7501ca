//! Site statistics service.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use blogdesk_core::result::AppResult;
use blogdesk_database::repositories::{
    BlogRepository, CategoryRepository, CommentRepository, StatsRepository, TagRepository,
    UserRepository,
};

/// How many recent posts the dashboard shows.
pub const LATEST_BLOGS: i64 = 6;

/// A `{ total }` counter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Total {
    pub total: i64,
}

/// Post counts per status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BlogTotals {
    pub total: i64,
    pub published: i64,
    pub draft: i64,
    pub archived: i64,
}

/// A recent post in the dashboard summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatestBlog {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Latest {
    pub blogs: Vec<LatestBlog>,
}

/// Dashboard summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteStats {
    pub blogs: BlogTotals,
    pub users: Total,
    pub categories: Total,
    pub tags: Total,
    pub comments: Total,
    pub views: Total,
    pub latest: Latest,
}

/// Aggregates counters from every repository.
#[derive(Debug, Clone)]
pub struct StatsService {
    stats_repo: Arc<StatsRepository>,
    blog_repo: Arc<BlogRepository>,
    user_repo: Arc<UserRepository>,
    category_repo: Arc<CategoryRepository>,
    tag_repo: Arc<TagRepository>,
    comment_repo: Arc<CommentRepository>,
}

impl StatsService {
    /// Creates a new stats service.
    pub fn new(
        stats_repo: Arc<StatsRepository>,
        blog_repo: Arc<BlogRepository>,
        user_repo: Arc<UserRepository>,
        category_repo: Arc<CategoryRepository>,
        tag_repo: Arc<TagRepository>,
        comment_repo: Arc<CommentRepository>,
    ) -> Self {
        Self {
            stats_repo,
            blog_repo,
            user_repo,
            category_repo,
            tag_repo,
            comment_repo,
        }
    }

    /// Builds the site summary.
    pub async fn summary(&self) -> AppResult<SiteStats> {
        let counts = self.stats_repo.blog_counts().await?;
        let latest = self
            .blog_repo
            .latest(LATEST_BLOGS)
            .await?
            .into_iter()
            .map(|b| LatestBlog {
                id: b.id,
                title: b.title,
                slug: b.slug,
                created_at: b.created_at,
            })
            .collect();

        Ok(SiteStats {
            blogs: BlogTotals {
                total: counts.total,
                published: counts.published,
                draft: counts.draft,
                archived: counts.archived,
            },
            users: Total {
                total: self.user_repo.count().await?,
            },
            categories: Total {
                total: self.category_repo.count().await?,
            },
            tags: Total {
                total: self.tag_repo.count().await?,
            },
            comments: Total {
                total: self.comment_repo.count().await?,
            },
            views: Total {
                total: counts.views,
            },
            latest: Latest { blogs: latest },
        })
    }
}
