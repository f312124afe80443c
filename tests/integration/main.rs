mod conversation_list;
mod feed_pagination;
mod helpers;
mod scroll_anchor;
mod send_pipeline;
mod stale_responses;
