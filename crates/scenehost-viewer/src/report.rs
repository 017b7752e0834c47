//! Scene summaries logged by the viewer

use scenehost_engine::{Component, ComponentKind, Scene};
use std::fmt;
use tracing::info;

/// Counts of what a scene currently holds
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SceneSummary {
    pub entities: usize,
    pub cameras: usize,
    pub lights: usize,
    pub renderables: usize,
    pub models: Vec<String>,
}

impl SceneSummary {
    pub fn of(scene: &Scene) -> Self {
        let models = scene
            .entities_with(ComponentKind::Model)
            .into_iter()
            .filter_map(|id| match scene.component(id, ComponentKind::Model) {
                Some(Component::Model(model)) => Some(model.source.clone()),
                _ => None,
            })
            .collect();

        Self {
            entities: scene.entity_count(),
            cameras: scene.entities_with(ComponentKind::Camera).len(),
            lights: scene.entities_with(ComponentKind::Light).len(),
            renderables: scene.entities_with(ComponentKind::Render).len(),
            models,
        }
    }
}

impl fmt::Display for SceneSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} entities, {} cameras, {} lights, {} renderables",
            self.entities, self.cameras, self.lights, self.renderables
        )?;
        if !self.models.is_empty() {
            write!(f, ", models: {}", self.models.join(", "))?;
        }
        Ok(())
    }
}

/// Log one line per attached entity
pub fn log_entities(scene: &Scene) {
    for entity in scene.entities().filter(|e| scene.is_attached(e.id)) {
        let angles = entity.transform.euler_angles();
        info!(
            entity = %entity.id,
            name = %entity.name,
            components = entity.components.len(),
            x = entity.transform.position.x,
            y = entity.transform.position.y,
            z = entity.transform.position.z,
            pitch = angles.x,
            yaw = angles.y,
            roll = angles.z,
            "Entity"
        );
    }
}
