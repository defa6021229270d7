//! Scripted model loader for headless runs and tests

use super::{ModelHandle, ModelLoader};
use crate::GameError;

/// What a [`StaticModelLoader`] reports for a request
#[derive(Debug, Clone, PartialEq)]
pub enum LoadScript {
    /// Succeed with a model of this radius and scale
    Succeed { local_radius: f32, scale: f32 },
    /// Fail with this reason
    Fail(String),
}

/// Completes every request after a fixed number of polls
#[derive(Debug, Clone)]
pub struct StaticModelLoader {
    script: LoadScript,
    latency_polls: u32,
    pending: Option<(String, u32)>,
    /// Requests seen so far
    pub requests: u32,
}

impl StaticModelLoader {
    pub fn new(script: LoadScript, latency_polls: u32) -> Self {
        Self {
            script,
            latency_polls,
            pending: None,
            requests: 0,
        }
    }

    /// The stock craft: 0.36 scale, about 4 units across in model space
    pub fn craft() -> Self {
        Self::new(
            LoadScript::Succeed {
                local_radius: 4.0,
                scale: 0.36,
            },
            3,
        )
    }

    /// Change what later requests report
    pub fn set_script(&mut self, script: LoadScript) {
        self.script = script;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl ModelLoader for StaticModelLoader {
    fn request(&mut self, asset: &str) {
        self.requests += 1;
        self.pending = Some((asset.to_string(), self.latency_polls));
    }

    fn poll(&mut self) -> Option<Result<ModelHandle, GameError>> {
        let (asset, remaining) = self.pending.as_mut()?;
        if *remaining > 0 {
            *remaining -= 1;
            return None;
        }
        let asset = std::mem::take(asset);
        self.pending = None;

        Some(match &self.script {
            LoadScript::Succeed { local_radius, scale } => Ok(ModelHandle {
                asset,
                local_radius: *local_radius,
                scale: *scale,
            }),
            LoadScript::Fail(reason) => Err(GameError::AssetLoad {
                asset,
                reason: reason.clone(),
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latency_then_success() {
        let mut loader = StaticModelLoader::craft();
        assert!(loader.poll().is_none());
        loader.request("ship.glb");
        for _ in 0..3 {
            assert!(loader.poll().is_none());
        }
        let handle = loader.poll().unwrap().unwrap();
        assert_eq!(handle.asset, "ship.glb");
        assert_eq!(handle.scale, 0.36);
        // Delivered once, no retry
        assert!(loader.poll().is_none());
        assert!(!loader.is_pending());
    }

    #[test]
    fn test_failure() {
        let mut loader = StaticModelLoader::new(LoadScript::Fail("404".into()), 0);
        loader.request("ship.glb");
        let err = loader.poll().unwrap().unwrap_err();
        assert!(matches!(err, GameError::AssetLoad { ref reason, .. } if reason == "404"));
        assert!(loader.poll().is_none());
    }
}
