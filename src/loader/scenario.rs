//! Scenario file loader
//!
//! One directive per line, `#` starts a comment:
//!
//! ```text
//! player 1 Alice 0 64 0 facing 0 0 1 health 20
//! mob 10 Zombie 3 64 0 health 20
//! solid 0 65 5
//! at 0 1 right_click fire
//! at 5 cooldown fire 3
//! at 6.5 quit 1
//! ```
//!
//! Setup lines (`player`, `mob`, `solid`) may appear anywhere and describe
//! the world before the first tick. `at` lines must be in time order.

use crate::core::{BlockPos, EntityId, EntityName, PlayerId, StoneType, Vec3};
use crate::listener::InteractAction;
use crate::sim::LivingKind;
use crate::{Result, StoneError};
use nom::{
    branch::alt,
    bytes::complete::{tag, take_till1},
    character::complete::{i32 as parse_i32, i64 as parse_i64, space1, u32 as parse_u32},
    combinator::{all_consuming, map, map_res, opt, value},
    number::complete::double,
    sequence::{preceded, tuple},
    IResult,
};
use rustc_hash::FxHashSet;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq)]
pub struct EntitySpec {
    pub id: EntityId,
    pub kind: LivingKind,
    pub name: EntityName,
    pub position: Vec3,
    pub facing: Option<Vec3>,
    pub health: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimedAction {
    Interact {
        player: PlayerId,
        action: InteractAction,
        stone: StoneType,
    },
    /// Live configuration change of one stone's cooldown
    SetCooldown { stone: StoneType, seconds: i64 },
    Quit(PlayerId),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimedDirective {
    pub line: usize,
    pub at_secs: f64,
    pub action: TimedAction,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scenario {
    pub entities: Vec<EntitySpec>,
    pub solids: Vec<BlockPos>,
    pub timeline: Vec<TimedDirective>,
}

enum Directive {
    Entity(EntitySpec),
    Solid(BlockPos),
    Timed(f64, TimedAction),
}

/// Latest time a timed directive may be scheduled at, one in-game day
pub const MAX_SCENARIO_SECS: f64 = 24.0 * 60.0 * 60.0;

pub struct ScenarioLoader;

impl ScenarioLoader {
    pub fn load_from_file(path: &Path) -> Result<Scenario> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Scenario> {
        let mut scenario = Scenario::default();
        let mut ids = FxHashSet::default();
        let mut last_time = 0.0_f64;

        for (index, raw) in content.lines().enumerate() {
            let line_no = index + 1;
            let line = raw.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }

            match parse_line(line, line_no)? {
                Directive::Entity(spec) => {
                    if !ids.insert(spec.id) {
                        return Err(StoneError::scenario(line_no, format!("duplicate entity id {}", spec.id)));
                    }
                    if spec.health.is_some_and(|hp| !(hp > 0.0 && hp.is_finite())) {
                        return Err(StoneError::scenario(line_no, "health must be positive"));
                    }
                    scenario.entities.push(spec);
                }
                Directive::Solid(block) => scenario.solids.push(block),
                Directive::Timed(at_secs, action) => {
                    if !at_secs.is_finite() || at_secs < 0.0 {
                        return Err(StoneError::scenario(line_no, format!("invalid time {at_secs}")));
                    }
                    if at_secs > MAX_SCENARIO_SECS {
                        return Err(StoneError::scenario(
                            line_no,
                            format!("time {at_secs} is past the {MAX_SCENARIO_SECS}s limit"),
                        ));
                    }
                    if at_secs < last_time {
                        return Err(StoneError::scenario(
                            line_no,
                            format!("time {at_secs} is earlier than previous directive at {last_time}"),
                        ));
                    }
                    last_time = at_secs;
                    scenario.timeline.push(TimedDirective {
                        line: line_no,
                        at_secs,
                        action,
                    });
                }
            }
        }

        scenario.check_references()?;
        Ok(scenario)
    }
}

impl Scenario {
    pub fn player_ids(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.entities
            .iter()
            .filter(|spec| spec.kind == LivingKind::Player)
            .map(|spec| spec.id)
    }

    /// Every timed directive must name a declared player
    fn check_references(&self) -> Result<()> {
        let players: FxHashSet<PlayerId> = self.player_ids().collect();
        for directive in &self.timeline {
            let player = match directive.action {
                TimedAction::Interact { player, .. } | TimedAction::Quit(player) => player,
                TimedAction::SetCooldown { .. } => continue,
            };
            if !players.contains(&player) {
                return Err(StoneError::scenario(directive.line, format!("unknown player {player}")));
            }
        }
        Ok(())
    }
}

fn parse_line(line: &str, line_no: usize) -> Result<Directive> {
    let keyword = line.split_whitespace().next().unwrap_or("");
    let parser: fn(&str) -> IResult<&str, Directive> = match keyword {
        "player" => player_directive,
        "mob" => mob_directive,
        "solid" => solid_directive,
        "at" => timed_directive,
        other => {
            return Err(StoneError::scenario(line_no, format!("unknown directive `{other}`")));
        }
    };

    match all_consuming(parser)(line) {
        Ok((_, directive)) => Ok(directive),
        Err(_) => Err(StoneError::scenario(line_no, format!("malformed {keyword} directive `{line}`"))),
    }
}

fn word(input: &str) -> IResult<&str, &str> {
    take_till1(char::is_whitespace)(input)
}

fn entity_id(input: &str) -> IResult<&str, EntityId> {
    map(parse_u32, EntityId::new)(input)
}

fn vec3(input: &str) -> IResult<&str, Vec3> {
    map(
        tuple((double, preceded(space1, double), preceded(space1, double))),
        |(x, y, z)| Vec3::new(x, y, z),
    )(input)
}

fn stone(input: &str) -> IResult<&str, StoneType> {
    map_res(word, str::parse::<StoneType>)(input)
}

fn keyword_arg<'a, O>(
    name: &'static str,
    arg: impl FnMut(&'a str) -> IResult<&'a str, O>,
) -> impl FnMut(&'a str) -> IResult<&'a str, O> {
    preceded(tuple((space1, tag(name), space1)), arg)
}

fn player_directive(input: &str) -> IResult<&str, Directive> {
    let (rest, (_, id, name, position, facing, health)) = tuple((
        tag("player"),
        preceded(space1, entity_id),
        preceded(space1, word),
        preceded(space1, vec3),
        opt(keyword_arg("facing", vec3)),
        opt(keyword_arg("health", double)),
    ))(input)?;
    Ok((
        rest,
        Directive::Entity(EntitySpec {
            id,
            kind: LivingKind::Player,
            name: EntityName::new(name),
            position,
            facing,
            health,
        }),
    ))
}

fn mob_directive(input: &str) -> IResult<&str, Directive> {
    let (rest, (_, id, name, position, health)) = tuple((
        tag("mob"),
        preceded(space1, entity_id),
        preceded(space1, word),
        preceded(space1, vec3),
        opt(keyword_arg("health", double)),
    ))(input)?;
    Ok((
        rest,
        Directive::Entity(EntitySpec {
            id,
            kind: LivingKind::Mob,
            name: EntityName::new(name),
            position,
            facing: None,
            health,
        }),
    ))
}

fn solid_directive(input: &str) -> IResult<&str, Directive> {
    map(
        preceded(
            tag("solid"),
            tuple((
                preceded(space1, parse_i32),
                preceded(space1, parse_i32),
                preceded(space1, parse_i32),
            )),
        ),
        |(x, y, z)| Directive::Solid(BlockPos::new(x, y, z)),
    )(input)
}

fn click(input: &str) -> IResult<&str, InteractAction> {
    alt((
        value(InteractAction::RightClickAir, tag("right_click")),
        value(InteractAction::LeftClickAir, tag("left_click")),
    ))(input)
}

fn interact_action(input: &str) -> IResult<&str, TimedAction> {
    map(
        tuple((entity_id, preceded(space1, click), preceded(space1, stone))),
        |(player, action, stone)| TimedAction::Interact {
            player,
            action,
            stone,
        },
    )(input)
}

fn cooldown_action(input: &str) -> IResult<&str, TimedAction> {
    map(
        preceded(
            tag("cooldown"),
            tuple((preceded(space1, stone), preceded(space1, parse_i64))),
        ),
        |(stone, seconds)| TimedAction::SetCooldown { stone, seconds },
    )(input)
}

fn quit_action(input: &str) -> IResult<&str, TimedAction> {
    map(preceded(tuple((tag("quit"), space1)), entity_id), TimedAction::Quit)(input)
}

fn timed_directive(input: &str) -> IResult<&str, Directive> {
    map(
        preceded(
            tag("at"),
            tuple((
                preceded(space1, double),
                preceded(space1, alt((cooldown_action, quit_action, interact_action))),
            )),
        ),
        |(at, action)| Directive::Timed(at, action),
    )(input)
}
