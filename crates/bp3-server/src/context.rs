//! Caller identity forwarded by the workflow platform.
use axum::http::HeaderMap;
use std::fmt;

/// Values of the `x-monkeys-*` headers. Logged, never checked.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RequestContext {
    pub app_id: Option<String>,
    pub user_id: Option<String>,
    pub team_id: Option<String>,
    pub workflow_id: Option<String>,
    pub workflow_instance_id: Option<String>,
}

impl RequestContext {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string)
        };
        RequestContext {
            app_id: header("x-monkeys-appid"),
            user_id: header("x-monkeys-userid"),
            team_id: header("x-monkeys-teamid"),
            workflow_id: header("x-monkeys-workflowid"),
            workflow_instance_id: header("x-monkeys-workflow-instanceid"),
        }
    }
}

impl fmt::Display for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".to_string());
        write!(
            f,
            "app={} user={} team={} workflow={} instance={}",
            show(&self.app_id),
            show(&self.user_id),
            show(&self.team_id),
            show(&self.workflow_id),
            show(&self.workflow_instance_id),
        )
    }
}
