use crate::api::DirectoryParams;
use crate::client::{ApiRequest, RequestContext};
use crate::types::{Config, ConfigProviders};
use crate::Result;

service! {
    /// Server configuration.
    ConfigService
}

impl<'a> ConfigService<'a> {
    /// `GET /config`
    pub async fn get(&self, ctx: &RequestContext, params: &DirectoryParams) -> Result<Config> {
        let request = ApiRequest::get("config").query(params)?;
        self.client.execute(ctx, request, &self.options).await
    }

    /// `GET /config/providers`
    pub async fn providers(&self, ctx: &RequestContext, params: &DirectoryParams) -> Result<ConfigProviders> {
        let request = ApiRequest::get("config/providers").query(params)?;
        self.client.execute(ctx, request, &self.options).await
    }
}
