use crate::types::HealthRes;

/// Simple health service used by the REST API.
///
/// Reports liveness and how many panels have a classifier loaded, so a deployment missing its
/// model files is visible from the health endpoint.
pub struct HealthService;

impl HealthService {
    /// Check health for a registry with `panels_available` loaded classifiers.
    ///
    /// # Returns
    /// A `HealthRes`; `ok` is false when no panel has a classifier.
    pub fn check_health(panels_available: usize) -> HealthRes {
        let panels_available = u32::try_from(panels_available).unwrap_or(u32::MAX);
        HealthRes {
            ok: panels_available > 0,
            message: if panels_available > 0 {
                "Health Assistant is alive".into()
            } else {
                "Health Assistant is alive but no models are loaded".into()
            },
            panels_available,
        }
    }
}
