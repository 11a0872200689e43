use clap::ValueEnum;
use kcc::{
    ColliderShapeDef, MoveInput, Quat, StaticWorld, Vec3, WorldError, WorldStaticDef,
};

/// Built-in test courses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Scenario {
    /// Walk into a wall at x = 1.
    Wall,
    /// Drop onto a 20 degree slope.
    Fall,
    /// Run up a 15 degree ramp.
    Ramp,
    /// Walk diagonally into the inner corner of two walls.
    Corner,
}

/// A world, a spawn point and a constant input.
pub struct Setup {
    pub world: StaticWorld,
    pub spawn: Vec3,
    pub input: MoveInput,
}

impl Scenario {
    pub fn build(self) -> Result<Setup, WorldError> {
        let (defs, spawn, input) = match self {
            Scenario::Wall => (
                vec![floor(0), wall_x(1)],
                Vec3::new(0.0, 0.5, 0.0),
                MoveInput::walk(Vec3::x()),
            ),
            Scenario::Fall => (
                vec![WorldStaticDef::new(
                    0,
                    Vec3::zeros(),
                    Quat::from_axis_angle(&Vec3::z_axis(), 20f32.to_radians()),
                    ColliderShapeDef::Plane {
                        offset_along_normal: 0.0,
                    },
                )],
                Vec3::new(0.0, 3.0, 0.0),
                MoveInput::idle(),
            ),
            Scenario::Ramp => (
                vec![
                    floor(0),
                    WorldStaticDef::new(
                        1,
                        Vec3::new(4.0, 0.29, 0.0),
                        Quat::from_axis_angle(&Vec3::z_axis(), 15f32.to_radians()),
                        ColliderShapeDef::Cuboid {
                            half_extents: Vec3::new(3.0, 0.5, 3.0),
                        },
                    ),
                ],
                Vec3::new(0.0, 0.5, 0.0),
                MoveInput::run(Vec3::x()),
            ),
            Scenario::Corner => (
                vec![
                    floor(0),
                    wall_x(1),
                    WorldStaticDef::new(
                        2,
                        Vec3::new(0.0, 2.0, 1.0),
                        Quat::identity(),
                        ColliderShapeDef::Cuboid {
                            half_extents: Vec3::new(2.0, 2.0, 0.5),
                        },
                    ),
                ],
                Vec3::new(0.0, 0.5, -0.5),
                MoveInput::walk(Vec3::new(1.0, 0.0, 1.0)),
            ),
        };

        Ok(Setup {
            world: StaticWorld::build(defs)?,
            spawn,
            input,
        })
    }
}

fn floor(id: u32) -> WorldStaticDef {
    WorldStaticDef::new(
        id,
        Vec3::zeros(),
        Quat::identity(),
        ColliderShapeDef::Plane {
            offset_along_normal: 0.0,
        },
    )
}

/// Slab whose -X face sits at x = 1.
fn wall_x(id: u32) -> WorldStaticDef {
    WorldStaticDef::new(
        id,
        Vec3::new(1.5, 2.0, 0.0),
        Quat::identity(),
        ColliderShapeDef::Cuboid {
            half_extents: Vec3::new(0.5, 2.0, 2.0),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use kcc::{Character, CharacterSettings};

    fn run(scenario: Scenario, ticks: u32) -> Character {
        let setup = scenario.build().expect("built-in scenarios are valid");
        let mut character =
            Character::new(CharacterSettings::default(), setup.spawn).expect("default settings");
        for _ in 0..ticks {
            character.step(&setup.world, setup.input, 0.05);
        }
        character
    }

    #[test]
    fn every_scenario_builds() {
        for scenario in Scenario::value_variants() {
            assert!(scenario.build().is_ok(), "{scenario:?}");
        }
    }

    #[test]
    fn wall_scenario_ends_against_the_wall() {
        let c = run(Scenario::Wall, 60);
        assert!(c.capsule().bottom.x <= 0.75);
        assert!(c.capsule().bottom.x > 0.6);
        assert!(c.motion().grounded);
    }

    #[test]
    fn fall_scenario_lands_on_the_slope() {
        let c = run(Scenario::Fall, 60);
        let n = Quat::from_axis_angle(&Vec3::z_axis(), 20f32.to_radians()) * Vec3::y();
        // Never below the surface.
        assert!(c.capsule().bottom.dot(&n) >= c.capsule().radius - 1.0e-3);
        assert!(c.position().y < 3.0);
    }

    #[test]
    fn ramp_scenario_climbs() {
        // About 4 m of travel: onto the ramp but short of its far end.
        let c = run(Scenario::Ramp, 12);
        assert!(c.position().x > 1.0);
        assert!(c.position().y > 0.6);
    }
}
