//! Command parser: one REPL line → one `Command`
//!
//! Verbs are case-insensitive; arguments are whitespace separated, points
//! also accept commas (`click 1.5,2,-3`).

use lazy_static::lazy_static;
use regex::Regex;

use crate::types::geometry::Point3;
use crate::types::{DsmState, Intent, StabilizerId, TemplateId, VisToggle};
use crate::{GospError, Result};

lazy_static! {
    // verb + optional remainder
    static ref RE_COMMAND: Regex = Regex::new(r"^\s*([A-Za-z_]+)(?:\s+(.*?))?\s*$").unwrap();

    // three finite numbers (signed, `.5`, exponents) separated by spaces and/or commas
    static ref RE_POINT: Regex = {
        let num = r"([+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?)";
        Regex::new(&format!(r"^\(?\s*{num}\s*[,\s]\s*{num}\s*[,\s]\s*{num}\s*\)?$")).unwrap()
    };
}

pub const HELP: &str = "\
Session commands:
  dsm <STATE>                 transition (UNFOLDED, FOLDING, NATIVE, BREATHING, STABILIZED)
  template <name>             arm placement (trehalose, glycerol, tmao)
  cancel                      back to inspect
  place <dehydron> [template] place on a dehydron (template defaults to the armed one)
  click <x> <y> <z>           snap a picked point to the nearest dehydron
  remove <stabilizer-id>      remove a stabilizer
  advance                     next VDEM cascade step
  residue <index>             select a residue
  bond <id>                   select a hydrogen bond
  speed <value>               breathing speed, 0 to 3
  toggle <key>                backbone, side_chains, h_bonds, dehydrons, voids, water
  reset                       initial configuration
  state | catalog | transitions
Lock commands:
  identify [x y z]            IDENTIFY_VOID (defaults to the YBR032W target)
  verify [energy [valid]]     VERIFY_MA (defaults to -17.2 true)
  reset | state
General:
  help | quit | exit";

/// Parsed REPL line
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Intent that needs no catalog lookup
    Dispatch(Intent),
    Place {
        dehydron: String,
        template: Option<TemplateId>,
    },
    Click(Point3),
    Identify(Option<Point3>),
    Verify {
        energy: Option<f64>,
        ramachandran_valid: Option<bool>,
    },
    Reset,
    State,
    Catalog,
    Transitions,
    Help,
    Quit,
}

/// Parse a single line
pub fn parse_command(line: &str) -> Result<Command> {
    let caps = RE_COMMAND
        .captures(line)
        .ok_or_else(|| GospError::Command(format!("cannot parse '{}'", line.trim())))?;
    let verb = caps[1].to_ascii_lowercase();
    let rest = caps.get(2).map(|m| m.as_str()).unwrap_or("");
    let args: Vec<&str> = rest.split_whitespace().collect();

    let command = match verb.as_str() {
        "dsm" => {
            let target = single(&verb, &args)?
                .parse::<DsmState>()
                .map_err(GospError::Command)?;
            Command::Dispatch(Intent::TransitionDsm { target })
        }
        "template" => {
            let template = parse_template(single(&verb, &args)?)?;
            Command::Dispatch(Intent::SelectTemplate { template })
        }
        "cancel" => none(&verb, &args, Command::Dispatch(Intent::CancelPlacement))?,
        "place" => match args.as_slice() {
            [dehydron] => Command::Place { dehydron: dehydron.to_string(), template: None },
            [dehydron, template] => Command::Place {
                dehydron: dehydron.to_string(),
                template: Some(parse_template(template)?),
            },
            _ => return Err(usage("place <dehydron> [template]")),
        },
        "click" => Command::Click(parse_point(rest)?),
        "remove" => Command::Dispatch(Intent::RemoveStabilizer {
            id: StabilizerId(single(&verb, &args)?.to_string()),
        }),
        "advance" => none(&verb, &args, Command::Dispatch(Intent::AdvanceVdem))?,
        "residue" => {
            let arg = single(&verb, &args)?;
            let residue = arg
                .parse::<usize>()
                .map_err(|_| GospError::Command(format!("'{}' is not a residue index", arg)))?;
            Command::Dispatch(Intent::SelectResidue { residue })
        }
        "bond" => Command::Dispatch(Intent::SelectBond {
            bond: single(&verb, &args)?.to_string(),
        }),
        "speed" => Command::Dispatch(Intent::SetBreathingSpeed {
            speed: parse_number(single(&verb, &args)?)?,
        }),
        "toggle" => {
            let key = single(&verb, &args)?
                .parse::<VisToggle>()
                .map_err(GospError::Command)?;
            Command::Dispatch(Intent::ToggleVis { key })
        }
        "identify" => {
            if rest.is_empty() {
                Command::Identify(None)
            } else {
                Command::Identify(Some(parse_point(rest)?))
            }
        }
        "verify" => match args.as_slice() {
            [] => Command::Verify { energy: None, ramachandran_valid: None },
            [energy] => Command::Verify { energy: Some(parse_number(energy)?), ramachandran_valid: None },
            [energy, valid] => Command::Verify {
                energy: Some(parse_number(energy)?),
                ramachandran_valid: Some(parse_bool(valid)?),
            },
            _ => return Err(usage("verify [energy [valid]]")),
        },
        "reset" => none(&verb, &args, Command::Reset)?,
        "state" | "status" => none(&verb, &args, Command::State)?,
        "catalog" => none(&verb, &args, Command::Catalog)?,
        "transitions" => none(&verb, &args, Command::Transitions)?,
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(GospError::Command(format!("unknown command '{}' (try 'help')", other))),
    };
    Ok(command)
}

fn usage(form: &str) -> GospError {
    GospError::Command(format!("usage: {}", form))
}

fn single<'a>(verb: &str, args: &[&'a str]) -> Result<&'a str> {
    match args {
        [arg] => Ok(*arg),
        _ => Err(GospError::Command(format!("'{}' takes exactly one argument", verb))),
    }
}

fn none(verb: &str, args: &[&str], command: Command) -> Result<Command> {
    if args.is_empty() {
        Ok(command)
    } else {
        Err(GospError::Command(format!("'{}' takes no arguments", verb)))
    }
}

fn parse_template(s: &str) -> Result<TemplateId> {
    s.parse::<TemplateId>().map_err(GospError::Command)
}

fn parse_number(s: &str) -> Result<f64> {
    s.parse::<f64>()
        .map_err(|_| GospError::Command(format!("'{}' is not a number", s)))
}

fn parse_bool(s: &str) -> Result<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "1" => Ok(true),
        "false" | "no" | "n" | "0" => Ok(false),
        _ => Err(GospError::Command(format!("'{}' is not true/false", s))),
    }
}

/// Parse `x y z`, `x,y,z` or `(x, y, z)`
pub fn parse_point(s: &str) -> Result<Point3> {
    let caps = RE_POINT
        .captures(s.trim())
        .ok_or_else(|| GospError::Command(format!("'{}' is not a point (x y z)", s.trim())))?;
    let mut point = [0.0; 3];
    for (axis, slot) in point.iter_mut().enumerate() {
        *slot = parse_number(&caps[axis + 1])?;
    }
    Ok(point)
}
