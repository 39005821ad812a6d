//! Host functions exposed to scripts.
//!
//! Every entry point validates its arguments leniently: enum arguments are
//! accepted as the integer from the published tables or as the variant name
//! (case-insensitive), and anything out of range is ignored rather than
//! faulting the script.

use std::str::FromStr;

use mlua::{Function, Lua, Table, Value};
use skirmish_core::{
    Action, AttackDirection, AttackType, Direction, EntityHandle, MovementType, ObjectType,
    Parameter,
};
use strum::IntoEnumIterator;

use super::{ScriptCommand, ScriptFrame};

/// Globals a sandboxed script must not reach.
const REMOVED_GLOBALS: &[&str] = &[
    "pcall",
    "xpcall",
    "load",
    "loadfile",
    "dofile",
    "collectgarbage",
    "print",
];

/// Closed enum addressable from scripts by index or by name.
pub(crate) trait ScriptEnum: Copy + AsRef<str> + FromStr + IntoEnumIterator + 'static {
    /// Name of the global table listing the variants.
    const TABLE: &'static str;

    fn from_index(index: u8) -> Option<Self>;

    fn index(self) -> u8;

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Integer(index) => u8::try_from(*index).ok().and_then(Self::from_index),
            Value::Number(index) if index.fract() == 0.0 && (0.0..=255.0).contains(index) => {
                Self::from_index(*index as u8)
            }
            Value::String(name) => name.to_str().ok()?.parse().ok(),
            _ => None,
        }
    }
}

macro_rules! script_enum {
    ($($ty:ident),* $(,)?) => {
        $(
            impl ScriptEnum for $ty {
                const TABLE: &'static str = stringify!($ty);

                fn from_index(index: u8) -> Option<Self> {
                    $ty::from_repr(index)
                }

                fn index(self) -> u8 {
                    self as u8
                }
            }
        )*
    };
}

script_enum!(
    Action,
    Direction,
    AttackType,
    AttackDirection,
    MovementType,
    Parameter,
    ObjectType,
);

/// Entity reference as passed to and from scripts.
pub(crate) fn handle_of(value: &Value) -> Option<EntityHandle> {
    match value {
        Value::Integer(bits) => Some(EntityHandle::from_bits(*bits as u64)),
        Value::Number(bits) if bits.fract() == 0.0 => Some(EntityHandle::from_bits(*bits as i64 as u64)),
        _ => None,
    }
}

pub(crate) fn handle_value(handle: EntityHandle) -> i64 {
    handle.to_bits() as i64
}

fn with_frame<R>(lua: &Lua, f: impl FnOnce(&mut ScriptFrame) -> R) -> mlua::Result<R> {
    let mut frame = lua.app_data_mut::<ScriptFrame>().ok_or_else(|| {
        mlua::Error::RuntimeError("host API called outside of a decision turn".into())
    })?;
    Ok(f(&mut frame))
}

fn publish<T: ScriptEnum>(lua: &Lua, globals: &Table) -> mlua::Result<()> {
    let table = lua.create_table()?;
    for variant in T::iter() {
        table.set(variant.as_ref(), variant.index())?;
    }
    globals.set(T::TABLE, table)
}

/// Installs the sandbox, the enum tables and every host function.
pub(crate) fn install(lua: &Lua) -> mlua::Result<()> {
    let globals = lua.globals();
    for name in REMOVED_GLOBALS {
        globals.set(*name, Value::Nil)?;
    }

    publish::<Action>(lua, &globals)?;
    publish::<Direction>(lua, &globals)?;
    publish::<AttackType>(lua, &globals)?;
    publish::<AttackDirection>(lua, &globals)?;
    publish::<MovementType>(lua, &globals)?;
    publish::<Parameter>(lua, &globals)?;
    publish::<ObjectType>(lua, &globals)?;

    let wait: Function = lua
        .load("local yield = coroutine.yield\nreturn function(...) return yield(...) end")
        .set_name("=wait")
        .eval()?;
    globals.set("wait", wait)?;

    install_intent(lua, &globals)?;
    install_queries(lua, &globals)?;
    install_progression(lua, &globals)?;
    install_world(lua, &globals)?;
    Ok(())
}

fn install_intent(lua: &Lua, globals: &Table) -> mlua::Result<()> {
    globals.set(
        "setAction",
        lua.create_function(|lua, value: Value| {
            with_frame(lua, |frame| {
                if let Some(action) = Action::from_value(&value) {
                    frame.state.intent_mut().action = action;
                }
            })
        })?,
    )?;
    globals.set(
        "setDirection",
        lua.create_function(|lua, value: Value| {
            with_frame(lua, |frame| {
                if let Some(direction) = Direction::from_value(&value) {
                    frame.state.intent_mut().direction = direction;
                }
            })
        })?,
    )?;
    globals.set(
        "setAttackType",
        lua.create_function(|lua, value: Value| {
            with_frame(lua, |frame| {
                if let Some(attack_type) = AttackType::from_value(&value) {
                    frame.state.intent_mut().attack_type = attack_type;
                }
            })
        })?,
    )?;
    globals.set(
        "setAttackDirection",
        lua.create_function(|lua, value: Value| {
            with_frame(lua, |frame| {
                if let Some(direction) = AttackDirection::from_value(&value) {
                    frame.state.intent_mut().attack_direction = direction;
                }
            })
        })?,
    )?;
    globals.set(
        "setBlockDirection",
        lua.create_function(|lua, value: Value| {
            with_frame(lua, |frame| {
                if let Some(direction) = AttackDirection::from_value(&value) {
                    frame.state.intent_mut().block_direction = direction;
                }
            })
        })?,
    )?;
    globals.set(
        "setMovementType",
        lua.create_function(|lua, value: Value| {
            with_frame(lua, |frame| {
                if let Some(movement) = MovementType::from_value(&value) {
                    frame.state.intent_mut().movement_type = movement;
                }
            })
        })?,
    )?;
    globals.set(
        "setTarget",
        lua.create_function(|lua, value: Value| {
            with_frame(lua, |frame| match &value {
                Value::Nil | Value::Boolean(false) => frame.state.intent_mut().target = None,
                other => {
                    if let Some(target) = handle_of(other) {
                        frame.state.intent_mut().target = Some(target);
                    }
                }
            })
        })?,
    )?;

    globals.set(
        "getAction",
        lua.create_function(|lua, ()| with_frame(lua, |frame| frame.state.intent().action.index()))?,
    )?;
    globals.set(
        "getDirection",
        lua.create_function(|lua, ()| {
            with_frame(lua, |frame| frame.state.intent().direction.index())
        })?,
    )?;
    globals.set(
        "getMovementType",
        lua.create_function(|lua, ()| {
            with_frame(lua, |frame| frame.state.intent().movement_type.index())
        })?,
    )?;
    globals.set(
        "getTarget",
        lua.create_function(|lua, ()| {
            with_frame(lua, |frame| frame.state.intent().target.map(handle_value))
        })?,
    )?;
    Ok(())
}

fn install_queries(lua: &Lua, globals: &Table) -> mlua::Result<()> {
    globals.set(
        "getMe",
        lua.create_function(|lua, ()| with_frame(lua, |frame| handle_value(frame.me)))?,
    )?;
    globals.set(
        "getPosition",
        lua.create_function(|lua, ()| {
            with_frame(lua, |frame| {
                let position = frame.state.position();
                (position.x, position.y)
            })
        })?,
    )?;
    globals.set(
        "getObjectPosition",
        lua.create_function(|lua, value: Value| {
            with_frame(lua, |frame| {
                let position = handle_of(&value).and_then(|handle| frame.object_position(handle));
                (position.map(|p| p.x), position.map(|p| p.y))
            })
        })?,
    )?;
    globals.set(
        "getObjectType",
        lua.create_function(|lua, value: Value| {
            with_frame(lua, |frame| match &value {
                Value::Nil => Some(frame.state.kind().index()),
                other => handle_of(other)
                    .and_then(|handle| frame.object_kind(handle))
                    .map(ObjectType::index),
            })
        })?,
    )?;
    globals.set(
        "getHp",
        lua.create_function(|lua, ()| with_frame(lua, |frame| frame.state.hit_points()))?,
    )?;
    globals.set(
        "getMaxHp",
        lua.create_function(|lua, ()| with_frame(lua, |frame| frame.stats().max_hit_points()))?,
    )?;
    globals.set(
        "getStamina",
        lua.create_function(|lua, ()| with_frame(lua, |frame| frame.state.stamina()))?,
    )?;
    globals.set(
        "getMaxStamina",
        lua.create_function(|lua, ()| with_frame(lua, |frame| frame.stats().max_stamina()))?,
    )?;
    globals.set(
        "getAttackStaminaCost",
        lua.create_function(|lua, ()| {
            with_frame(lua, |frame| {
                let attack_type = frame.state.intent().attack_type;
                frame.stats().attack_stamina_cost(attack_type)
            })
        })?,
    )?;
    globals.set(
        "getMoveStaminaCost",
        lua.create_function(|lua, ()| {
            with_frame(lua, |frame| frame.stats().move_stamina_cost(MovementType::Default))
        })?,
    )?;
    globals.set(
        "getSprintStaminaCost",
        lua.create_function(|lua, ()| {
            with_frame(lua, |frame| frame.stats().move_stamina_cost(MovementType::Sprint))
        })?,
    )?;
    globals.set(
        "getBlockStaminaCost",
        lua.create_function(|lua, ()| with_frame(lua, |frame| frame.stats().block_stamina_cost()))?,
    )?;
    globals.set(
        "canMove",
        lua.create_function(|lua, ()| {
            with_frame(lua, |frame| frame.state.can_move(frame.now, &frame.rules))
        })?,
    )?;
    globals.set(
        "canAttack",
        lua.create_function(|lua, ()| {
            with_frame(lua, |frame| frame.state.can_attack(frame.now, &frame.rules))
        })?,
    )?;
    globals.set(
        "isOnCooldown",
        lua.create_function(|lua, ()| with_frame(lua, |frame| frame.state.is_on_cooldown(frame.now)))?,
    )?;
    globals.set(
        "getVisibleObjects",
        lua.create_function(|lua, ()| {
            with_frame(lua, |frame| {
                frame
                    .visible_objects()
                    .into_iter()
                    .map(handle_value)
                    .collect::<Vec<_>>()
            })
        })?,
    )?;
    globals.set(
        "log",
        lua.create_function(|lua, value: Value| {
            let message = match lua.coerce_string(value)? {
                Some(text) => text.to_string_lossy().into_owned(),
                None => String::from("<unprintable>"),
            };
            with_frame(lua, |frame| {
                tracing::info!(
                    entity = ?frame.me,
                    name = %frame.state.record().name,
                    tick = frame.now.0,
                    "{}",
                    message
                );
            })
        })?,
    )?;
    Ok(())
}

fn install_progression(lua: &Lua, globals: &Table) -> mlua::Result<()> {
    globals.set(
        "levelUp",
        lua.create_function(|lua, value: Value| {
            with_frame(lua, |frame| match Parameter::from_value(&value) {
                Some(parameter) => frame.state.level_up(parameter, &frame.rules).is_ok(),
                None => false,
            })
        })?,
    )?;
    globals.set(
        "getLevel",
        lua.create_function(|lua, ()| with_frame(lua, |frame| frame.state.progression().level()))?,
    )?;
    globals.set(
        "getAvailableSkillPoints",
        lua.create_function(|lua, ()| {
            with_frame(lua, |frame| frame.state.progression().skill_points())
        })?,
    )?;
    globals.set(
        "getCurrentExp",
        lua.create_function(|lua, ()| {
            with_frame(lua, |frame| frame.state.progression().current_exp())
        })?,
    )?;
    globals.set(
        "getNextLevelExp",
        lua.create_function(|lua, ()| {
            with_frame(lua, |frame| frame.state.progression().next_level_exp())
        })?,
    )?;
    globals.set(
        "getParameterLevel",
        lua.create_function(|lua, value: Value| {
            with_frame(lua, |frame| {
                Parameter::from_value(&value).map(|parameter| frame.state.parameter_level(parameter))
            })
        })?,
    )?;
    globals.set(
        "getParameterLevelUpCost",
        lua.create_function(|lua, value: Value| {
            with_frame(lua, |frame| {
                Parameter::from_value(&value)
                    .map(|parameter| frame.state.parameter_level_up_cost(parameter, &frame.rules))
            })
        })?,
    )?;
    Ok(())
}

fn install_world(lua: &Lua, globals: &Table) -> mlua::Result<()> {
    globals.set(
        "getItems",
        lua.create_function(|lua, ()| {
            with_frame(lua, |frame| {
                frame
                    .state
                    .inventory()
                    .items()
                    .map(handle_value)
                    .collect::<Vec<_>>()
            })
        })?,
    )?;
    globals.set(
        "useItem",
        lua.create_function(|lua, value: Value| {
            with_frame(lua, |frame| match handle_of(&value) {
                Some(item) if frame.carries(item) => {
                    frame.commands.push(ScriptCommand::UseItem(item));
                    true
                }
                _ => false,
            })
        })?,
    )?;
    globals.set(
        "takeItem",
        lua.create_function(|lua, value: Value| {
            with_frame(lua, |frame| {
                let item = handle_of(&value).filter(|item| {
                    frame
                        .snapshot
                        .observe(*item)
                        .is_some_and(|view| view.kind.is_item())
                });
                match item {
                    Some(item) => {
                        frame.commands.push(ScriptCommand::TakeItem(item));
                        true
                    }
                    None => false,
                }
            })
        })?,
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enum_values_accept_index_and_name() {
        let lua = Lua::new();
        let name = Value::String(lua.create_string("sprint").unwrap());
        assert_eq!(MovementType::from_value(&name), Some(MovementType::Sprint));
        assert_eq!(Action::from_value(&Value::Integer(1)), Some(Action::Attack));
        assert_eq!(Action::from_value(&Value::Number(2.0)), Some(Action::Block));
        assert_eq!(Action::from_value(&Value::Integer(42)), None);
        assert_eq!(Action::from_value(&Value::Integer(-1)), None);
        assert_eq!(Action::from_value(&Value::Number(1.5)), None);
        assert_eq!(Action::from_value(&Value::Boolean(true)), None);
    }

    #[test]
    fn tables_are_published() {
        let lua = Lua::new();
        install(&lua).unwrap();
        let npc: u8 = lua.load("return ObjectType.NPC").eval().unwrap();
        assert_eq!(npc, ObjectType::Npc.index());
        let left: u8 = lua.load("return Direction.Left").eval().unwrap();
        assert_eq!(left, Direction::Left.index());
        let pcall_gone: bool = lua.load("return pcall == nil").eval().unwrap();
        assert!(pcall_gone);
    }

    #[test]
    fn host_calls_outside_a_turn_fail() {
        let lua = Lua::new();
        install(&lua).unwrap();
        assert!(lua.load("getHp()").exec().is_err());
    }
}
