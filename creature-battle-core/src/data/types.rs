use phf::phf_map;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Type {
    Normal,
    Flame,
    Aqua,
    Leaf,
    Volt,
    Frost,
    Brawl,
    Venom,
    Terra,
    Gale,
    Mind,
    Insect,
    Stone,
    Spirit,
    Dragon,
    Shadow,
    Metal,
    Fae,
}

static TYPE_NAMES: phf::Map<&'static str, Type> = phf_map! {
    "normal" => Type::Normal,
    "flame" => Type::Flame,
    "aqua" => Type::Aqua,
    "leaf" => Type::Leaf,
    "volt" => Type::Volt,
    "frost" => Type::Frost,
    "brawl" => Type::Brawl,
    "venom" => Type::Venom,
    "terra" => Type::Terra,
    "gale" => Type::Gale,
    "mind" => Type::Mind,
    "insect" => Type::Insect,
    "stone" => Type::Stone,
    "spirit" => Type::Spirit,
    "dragon" => Type::Dragon,
    "shadow" => Type::Shadow,
    "metal" => Type::Metal,
    "fae" => Type::Fae,
};

impl Type {
    pub const ALL: [Type; 18] = [
        Type::Normal,
        Type::Flame,
        Type::Aqua,
        Type::Leaf,
        Type::Volt,
        Type::Frost,
        Type::Brawl,
        Type::Venom,
        Type::Terra,
        Type::Gale,
        Type::Mind,
        Type::Insect,
        Type::Stone,
        Type::Spirit,
        Type::Dragon,
        Type::Shadow,
        Type::Metal,
        Type::Fae,
    ];

    /// Case-insensitive lookup by type name.
    pub fn parse(name: &str) -> Option<Type> {
        TYPE_NAMES
            .get(name.trim().to_ascii_lowercase().as_str())
            .copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Type::Normal => "Normal",
            Type::Flame => "Flame",
            Type::Aqua => "Aqua",
            Type::Leaf => "Leaf",
            Type::Volt => "Volt",
            Type::Frost => "Frost",
            Type::Brawl => "Brawl",
            Type::Venom => "Venom",
            Type::Terra => "Terra",
            Type::Gale => "Gale",
            Type::Mind => "Mind",
            Type::Insect => "Insect",
            Type::Stone => "Stone",
            Type::Spirit => "Spirit",
            Type::Dragon => "Dragon",
            Type::Shadow => "Shadow",
            Type::Metal => "Metal",
            Type::Fae => "Fae",
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Type {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Type::parse(s).ok_or_else(|| format!("unknown type '{s}'"))
    }
}

impl<'de> Deserialize<'de> for Type {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Product of the per-type multipliers over every defending type.
pub fn type_effectiveness(move_type: Type, target_types: &[Type]) -> f64 {
    target_types
        .iter()
        .map(|&defending| single_type_effectiveness(move_type, defending))
        .product()
}

pub fn single_type_effectiveness(attacking: Type, defending: Type) -> f64 {
    use Type::*;
    match attacking {
        Normal => match defending {
            Stone | Metal => 0.5,
            Spirit => 0.0,
            _ => 1.0,
        },
        Flame => match defending {
            Flame | Aqua | Stone | Dragon => 0.5,
            Leaf | Frost | Insect | Metal => 2.0,
            _ => 1.0,
        },
        Aqua => match defending {
            Aqua | Leaf | Dragon => 0.5,
            Flame | Terra | Stone => 2.0,
            _ => 1.0,
        },
        Volt => match defending {
            Volt | Leaf | Dragon => 0.5,
            Aqua | Gale => 2.0,
            Terra => 0.0,
            _ => 1.0,
        },
        Leaf => match defending {
            Flame | Leaf | Venom | Gale | Insect | Dragon | Metal => 0.5,
            Aqua | Terra | Stone => 2.0,
            _ => 1.0,
        },
        Frost => match defending {
            Flame | Aqua | Frost | Metal => 0.5,
            Leaf | Terra | Gale | Dragon => 2.0,
            _ => 1.0,
        },
        Brawl => match defending {
            Normal | Frost | Stone | Shadow | Metal => 2.0,
            Venom | Gale | Mind | Insect | Fae => 0.5,
            Spirit => 0.0,
            _ => 1.0,
        },
        Venom => match defending {
            Leaf | Fae => 2.0,
            Venom | Terra | Stone | Spirit => 0.5,
            Metal => 0.0,
            _ => 1.0,
        },
        Terra => match defending {
            Flame | Volt | Venom | Stone | Metal => 2.0,
            Leaf | Insect => 0.5,
            Gale => 0.0,
            _ => 1.0,
        },
        Gale => match defending {
            Leaf | Brawl | Insect => 2.0,
            Volt | Stone | Metal => 0.5,
            _ => 1.0,
        },
        Mind => match defending {
            Brawl | Venom => 2.0,
            Mind | Metal => 0.5,
            Shadow => 0.0,
            _ => 1.0,
        },
        Insect => match defending {
            Leaf | Mind | Shadow => 2.0,
            Flame | Brawl | Venom | Gale | Spirit | Metal | Fae => 0.5,
            _ => 1.0,
        },
        Stone => match defending {
            Flame | Frost | Gale | Insect => 2.0,
            Brawl | Terra | Metal => 0.5,
            _ => 1.0,
        },
        Spirit => match defending {
            Spirit | Mind => 2.0,
            Shadow => 0.5,
            Normal => 0.0,
            _ => 1.0,
        },
        Dragon => match defending {
            Dragon => 2.0,
            Metal => 0.5,
            Fae => 0.0,
            _ => 1.0,
        },
        Shadow => match defending {
            Mind | Spirit => 2.0,
            Brawl | Shadow | Fae => 0.5,
            _ => 1.0,
        },
        Metal => match defending {
            Stone | Frost | Fae => 2.0,
            Flame | Aqua | Volt | Metal => 0.5,
            _ => 1.0,
        },
        Fae => match defending {
            Brawl | Dragon | Shadow => 2.0,
            Flame | Venom | Metal => 0.5,
            _ => 1.0,
        },
    }
}
