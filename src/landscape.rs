//! Landscape model and generator - scatters terrain rectangles over the world

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// The world plane extends this many viewports in each dimension.
pub const WORLD_SCALE: f32 = 3.0;

pub const RUNWAY_WIDTH: f32 = 104.0;
pub const RUNWAY_HEIGHT: f32 = 612.0;

const CLUSTER_JITTER: f32 = 100.0;
const ELEMENT_WIDTH_MIN: f32 = 30.0;
const ELEMENT_WIDTH_MAX: f32 = 120.0;
const ELEMENT_HEIGHT_MIN: f32 = 20.0;
const ELEMENT_HEIGHT_MAX: f32 = 80.0;

pub const GREEN_FIELD: Color = Color::rgb(34, 139, 34);
pub const BROWN_FIELD: Color = Color::rgb(139, 69, 19);
pub const DARK_GREEN: Color = Color::rgb(0, 100, 0);
pub const GREY_VILLAGE: Color = Color::rgb(128, 128, 128);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Axis-aligned rectangle anchored at its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn expanded(&self, margin: f32) -> Self {
        Self {
            x: self.x - margin,
            y: self.y - margin,
            width: self.width + margin * 2.0,
            height: self.height + margin * 2.0,
        }
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x > self.x
            && point.x < self.x + self.width
            && point.y > self.y
            && point.y < self.y + self.height
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.x + other.width
            && self.x + self.width > other.x
            && self.y < other.y + other.height
            && self.y + self.height > other.y
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TerrainKind {
    Field,
    Forest,
    Village,
}

/// One colored rectangle of the landscape. Immutable once generated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerrainElement {
    pub kind: TerrainKind,
    pub rect: Rect,
    pub color: Color,
}

fn default_clear_zone_margin() -> f32 {
    300.0
}

fn default_field_clusters() -> u32 {
    10
}

fn default_scatter_attempts() -> u32 {
    300
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LandscapeConfig {
    #[serde(default = "default_clear_zone_margin")]
    pub clear_zone_margin: f32,
    #[serde(default = "default_field_clusters")]
    pub field_clusters: u32,
    #[serde(default = "default_scatter_attempts")]
    pub scatter_attempts: u32,
}

impl Default for LandscapeConfig {
    fn default() -> Self {
        Self {
            clear_zone_margin: default_clear_zone_margin(),
            field_clusters: default_field_clusters(),
            scatter_attempts: default_scatter_attempts(),
        }
    }
}

/// Runway rectangle for a world of the given size, centered horizontally and
/// offset so the plane spawns just below its threshold.
pub fn runway_rect(world: Vec2) -> Rect {
    Rect::new(
        world.x / 2.0 - RUNWAY_WIDTH / 2.0,
        world.y / 2.0 - RUNWAY_HEIGHT / 2.0,
        RUNWAY_WIDTH,
        RUNWAY_HEIGHT,
    )
}

/// Scatter terrain over the world, keeping the zone around the runway clear.
///
/// Fields come in clusters: a cluster whose center lands in the keep-out zone
/// is skipped entirely (no retry, no redistribution), and each member is
/// rejected independently if its rectangle would touch the zone. Forest and
/// village elements are scattered uniformly with the same rejection. Element
/// totals therefore vary from run to run.
pub fn generate(
    config: &LandscapeConfig,
    world: Vec2,
    runway: Rect,
    rng: &mut impl Rng,
) -> Vec<TerrainElement> {
    let keep_out = runway.expanded(config.clear_zone_margin);
    let mut elements = Vec::new();

    for _ in 0..config.field_clusters {
        let center = Vec2::new(rng.gen_range(0.0..world.x), rng.gen_range(0.0..world.y));
        if keep_out.contains(center) {
            continue;
        }
        let count = rng.gen_range(5..=14);
        for _ in 0..count {
            let rect = random_extent(
                center.x + rng.gen_range(-CLUSTER_JITTER..CLUSTER_JITTER),
                center.y + rng.gen_range(-CLUSTER_JITTER..CLUSTER_JITTER),
                rng,
            );
            if rect.intersects(&keep_out) {
                continue;
            }
            let color = if rng.gen_bool(0.5) {
                GREEN_FIELD
            } else {
                BROWN_FIELD
            };
            elements.push(TerrainElement {
                kind: TerrainKind::Field,
                rect,
                color,
            });
        }
    }

    for _ in 0..config.scatter_attempts {
        let rect = random_extent(
            rng.gen_range(0.0..world.x),
            rng.gen_range(0.0..world.y),
            rng,
        );
        if rect.intersects(&keep_out) {
            continue;
        }
        let (kind, color) = if rng.gen_bool(0.5) {
            (TerrainKind::Forest, DARK_GREEN)
        } else {
            (TerrainKind::Village, GREY_VILLAGE)
        };
        elements.push(TerrainElement { kind, rect, color });
    }

    elements
}

fn random_extent(x: f32, y: f32, rng: &mut impl Rng) -> Rect {
    Rect::new(
        x,
        y,
        rng.gen_range(ELEMENT_WIDTH_MIN..ELEMENT_WIDTH_MAX),
        rng.gen_range(ELEMENT_HEIGHT_MIN..ELEMENT_HEIGHT_MAX),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn world() -> Vec2 {
        Vec2::new(3840.0, 2160.0)
    }

    #[test]
    fn test_rect_expansion() {
        let rect = Rect::new(100.0, 200.0, 104.0, 612.0);
        let expanded = rect.expanded(300.0);
        assert_eq!(expanded.x, -200.0);
        assert_eq!(expanded.y, -100.0);
        assert_eq!(expanded.width, 704.0);
        assert_eq!(expanded.height, 1212.0);
    }

    #[test]
    fn test_rect_intersection() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        let c = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(a.intersects(&b));
        // Edge contact does not count as overlap
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_runway_is_centered() {
        let runway = runway_rect(world());
        assert_eq!(runway.x, 3840.0 / 2.0 - 52.0);
        assert_eq!(runway.y, 2160.0 / 2.0 - 306.0);
        assert_eq!(runway.width, RUNWAY_WIDTH);
        assert_eq!(runway.height, RUNWAY_HEIGHT);
    }

    #[test]
    fn test_keep_out_zone_stays_clear() {
        let config = LandscapeConfig::default();
        let runway = runway_rect(world());
        let keep_out = runway.expanded(config.clear_zone_margin);
        for seed in 0..50 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let elements = generate(&config, world(), runway, &mut rng);
            for element in &elements {
                assert!(
                    !element.rect.intersects(&keep_out),
                    "seed {seed}: element at ({}, {}) overlaps the keep-out zone",
                    element.rect.x,
                    element.rect.y
                );
            }
        }
    }

    #[test]
    fn test_element_counts_stay_in_bounds() {
        let config = LandscapeConfig::default();
        let runway = runway_rect(world());
        for seed in 0..50 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let elements = generate(&config, world(), runway, &mut rng);
            let fields = elements
                .iter()
                .filter(|e| e.kind == TerrainKind::Field)
                .count();
            let scattered = elements.len() - fields;
            assert!(fields <= 140, "seed {seed}: {fields} fields");
            assert!(scattered <= 300, "seed {seed}: {scattered} forest/village");
        }
    }

    #[test]
    fn test_element_extents_stay_in_range() {
        let config = LandscapeConfig::default();
        let runway = runway_rect(world());
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for element in generate(&config, world(), runway, &mut rng) {
            assert!((ELEMENT_WIDTH_MIN..ELEMENT_WIDTH_MAX).contains(&element.rect.width));
            assert!((ELEMENT_HEIGHT_MIN..ELEMENT_HEIGHT_MAX).contains(&element.rect.height));
        }
    }

    #[test]
    fn test_kinds_carry_their_colors() {
        let config = LandscapeConfig::default();
        let runway = runway_rect(world());
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for element in generate(&config, world(), runway, &mut rng) {
            match element.kind {
                TerrainKind::Field => {
                    assert!(element.color == GREEN_FIELD || element.color == BROWN_FIELD)
                }
                TerrainKind::Forest => assert_eq!(element.color, DARK_GREEN),
                TerrainKind::Village => assert_eq!(element.color, GREY_VILLAGE),
            }
        }
    }
}
