//! Blog route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;
use tracing::{instrument, warn};

use emberline_core::BlogId;

use crate::api::{ApiError, Blog};
use crate::catalog::filters::empty_string_as_none;
use crate::catalog::{BLOG_PAGE_SIZE, page_window, paginate};
use crate::error::{AppError, Result};
use crate::filters;
use crate::state::AppState;

/// Shown when the blog listing cannot be loaded.
const BLOGS_ERROR_MESSAGE: &str = "Failed to load blog posts.";

/// Blog listing query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct BlogQuery {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub page: Option<u32>,
}

/// Post view for templates.
#[derive(Clone)]
pub struct PostView {
    pub url: String,
    pub title: String,
    pub excerpt: String,
    pub author: String,
    pub image: String,
    pub published_on: Option<String>,
    /// Body split into plain-text paragraphs.
    pub paragraphs: Vec<String>,
}

impl From<&Blog> for PostView {
    fn from(blog: &Blog) -> Self {
        Self {
            url: format!("/blog/{}", blog.id),
            title: blog.title.clone(),
            excerpt: blog.excerpt.clone(),
            author: blog.author.clone(),
            image: blog.image.clone(),
            published_on: blog
                .created_at
                .map(|at| at.format("%B %-d, %Y").to_string()),
            paragraphs: paragraphs(&blog.content),
        }
    }
}

/// Split plain text into paragraphs on blank lines.
fn paragraphs(text: &str) -> Vec<String> {
    text.replace("\r\n", "\n")
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_owned)
        .collect()
}

/// A numeric page button.
pub struct BlogPageLink {
    pub number: u32,
    pub url: String,
    pub current: bool,
}

/// Breadcrumb item for the post page.
pub struct BreadcrumbItem {
    pub name: String,
    pub url: Option<String>,
}

/// Blog index page template.
#[derive(Template, WebTemplate)]
#[template(path = "blog/index.html")]
pub struct BlogIndexTemplate {
    pub posts: Vec<PostView>,
    pub error: Option<String>,
    pub page: u32,
    pub total_pages: u32,
    pub pages: Vec<BlogPageLink>,
    pub previous_url: Option<String>,
    pub next_url: Option<String>,
}

/// Blog post detail template.
#[derive(Template, WebTemplate)]
#[template(path = "blog/show.html")]
pub struct BlogShowTemplate {
    pub post: PostView,
    pub breadcrumbs: Vec<BreadcrumbItem>,
}

fn page_url(page: u32) -> String {
    format!("/blog?page={page}")
}

/// Create the blog routes router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/{id}", get(show))
}

/// Display one page of the blog listing.
///
/// All posts are fetched and windowed here, five per page. A page outside
/// the listing renders empty with the controls still in place.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>, Query(query): Query<BlogQuery>) -> impl IntoResponse {
    let page = query.page.unwrap_or(1);

    let (blogs, error) = match state.api().blogs().await {
        Ok(list) => (list.blogs, None),
        Err(err) => {
            warn!(error = %err, "Failed to load blogs");
            (Vec::new(), Some(BLOGS_ERROR_MESSAGE.to_string()))
        }
    };

    let slice = paginate(&blogs, page, BLOG_PAGE_SIZE);

    BlogIndexTemplate {
        posts: slice.items.iter().map(PostView::from).collect(),
        error,
        page,
        total_pages: slice.total_pages,
        pages: page_window(page, slice.total_pages)
            .into_iter()
            .map(|number| BlogPageLink {
                number,
                url: page_url(number),
                current: number == page,
            })
            .collect(),
        previous_url: slice.has_previous().then(|| page_url(page - 1)),
        next_url: slice.has_next().then(|| page_url(page + 1)),
    }
}

/// Display a single blog post.
///
/// # Errors
///
/// Returns 404 if the id is malformed or the post cannot be loaded.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> Result<impl IntoResponse> {
    let blog_id =
        BlogId::parse(&id).map_err(|e| AppError::NotFound(format!("blog {id}: {e}")))?;

    let blog = state.api().blog_by_id(&blog_id).await.map_err(|err| {
        if !matches!(err, ApiError::NotFound(_)) {
            warn!(error = %err, "Blog lookup failed");
        }
        AppError::NotFound(format!("blog {id}"))
    })?;

    let post = PostView::from(&blog);
    let breadcrumbs = vec![
        BreadcrumbItem {
            name: "Home".to_string(),
            url: Some("/".to_string()),
        },
        BreadcrumbItem {
            name: "Blog".to_string(),
            url: Some("/blog".to_string()),
        },
        BreadcrumbItem {
            name: post.title.clone(),
            url: None,
        },
    ];

    Ok(BlogShowTemplate { post, breadcrumbs })
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    #[test]
    fn test_paragraphs_split_on_blank_lines() {
        assert_eq!(
            paragraphs("First line.\r\n\r\nSecond <b>para</b>.\n\n\n  \n\nThird."),
            vec!["First line.", "Second <b>para</b>.", "Third."]
        );
        assert!(paragraphs("  ").is_empty());
    }

    #[test]
    fn test_post_view() {
        let blog = Blog {
            id: "65f1c2a9e4b0a1b2c3d4e5f6".to_string(),
            title: "Pairing cigars with coffee".to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 3, 5, 12, 0, 0).single(),
            ..Blog::default()
        };

        let view = PostView::from(&blog);
        assert_eq!(view.url, "/blog/65f1c2a9e4b0a1b2c3d4e5f6");
        assert_eq!(view.published_on.as_deref(), Some("March 5, 2024"));
    }
}
