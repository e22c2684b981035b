//! Image URL for a dish, built locally.

use async_trait::async_trait;
use recipe_primitives::{ImageRequest, ImageUrl};
use recipe_prompts::image_url;
use tracing::info;

use crate::contracts::{self, FlowContract};
use crate::error::FlowResult;
use crate::flow::Flow;

/// Renders the image-service URL for a recipe name. Never calls a backend.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImageFlow;

#[async_trait]
impl Flow for ImageFlow {
    type Input = ImageRequest;
    type Output = ImageUrl;

    fn contract(&self) -> &'static FlowContract {
        &contracts::IMAGE
    }

    async fn run(&self, input: ImageRequest) -> FlowResult<ImageUrl> {
        info!(flow = self.contract().name, recipe = input.recipe_name(), "building image url");
        Ok(ImageUrl {
            image_url: image_url(input.recipe_name()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn builds_pollinations_url() {
        let url = ImageFlow.run(ImageRequest::new("Cerdo")).await.unwrap();
        assert_eq!(
            url.image_url,
            "https://image.pollinations.ai/prompt/carne%20de%20cerdo%20fotograf%C3%ADa%20de%20comida%20realista%2C%20primer%20plano"
        );
        contracts::IMAGE
            .output
            .check(&serde_json::to_value(&url).unwrap())
            .unwrap();
    }
}
