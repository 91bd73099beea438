use crate::domain::model::ApiRequest;
use crate::domain::ports::Dispatch;
use crate::endpoints::{V4, V6};

pub struct Changes<'a, C> {
    client: &'a C,
}

impl<'a, C: Dispatch> Changes<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    /// Projects and branches a change touches.
    pub fn affects_projects(&self, change: u64) -> C::Response<'a> {
        let request = self
            .client
            .require("changes.affects_projects", V4)
            .map(|_| ApiRequest::get(format!("changes/{}/affectsprojects", change)));
        self.client.dispatch(request)
    }

    /// Default reviewers of the projects a change touches.
    pub fn default_reviewers(&self, change: u64) -> C::Response<'a> {
        let request = self
            .client
            .require("changes.default_reviewers", V6)
            .map(|_| ApiRequest::get(format!("changes/{}/defaultreviewers", change)));
        self.client.dispatch(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoints::recorder::Recorder;

    #[test]
    fn test_change_paths() {
        let swarm = Recorder::v(9);
        assert_eq!(
            Changes::new(&swarm).affects_projects(42).unwrap().path,
            "changes/42/affectsprojects"
        );
        assert_eq!(
            Changes::new(&swarm).default_reviewers(42).unwrap().path,
            "changes/42/defaultreviewers"
        );
        assert!(Changes::new(&Recorder::v(5)).default_reviewers(42).is_err());
    }
}
