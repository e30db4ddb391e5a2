use crate::api::DirectoryParams;
use crate::client::request::path_param;
use crate::client::{ApiRequest, RequestContext};
use crate::types::Auth;
use crate::Result;

service! {
    /// Provider credentials.
    AuthService
}

impl<'a> AuthService<'a> {
    /// `PUT /auth/{id}`: stores credentials for provider `id`.
    pub async fn set(
        &self,
        ctx: &RequestContext,
        id: &str,
        auth: &Auth,
        params: &DirectoryParams,
    ) -> Result<bool> {
        let id = path_param("id", id)?;
        let request = ApiRequest::put("auth").segment(id).query(params)?.json(auth)?;
        self.client.execute(ctx, request, &self.options).await
    }
}
