//! Flood Safety Guide Lookup Table
//!
//! Ten contiguous 10-point bands from 0-10% up to 90-100%. Each band carries
//! Before/During/After advice rendered verbatim by the presentation layer.
//!
//! Bands share their boundary values (10 sits in both 0-10 and 10-20). The
//! scan is first-match in table order, so a boundary value always resolves to
//! the lower band.

use serde::Serialize;

/// A single guidance band with its advice text
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GuidanceTier {
    pub low: f64,
    pub high: f64,
    pub before: &'static str,
    pub during: &'static str,
    pub after: &'static str,
}

impl GuidanceTier {
    /// Inclusive on both ends
    pub fn contains(&self, risk_pct: f64) -> bool {
        self.low <= risk_pct && risk_pct <= self.high
    }

    /// "60-70" style label
    pub fn label(&self) -> String {
        format!("{}-{}", self.low, self.high)
    }
}

// ============================================================================
// EMBEDDED SAFETY GUIDE
// ============================================================================

pub static SAFETY_GUIDE: &[GuidanceTier] = &[
    GuidanceTier {
        low: 0.0,
        high: 10.0,
        before: "Keep checking daily weather forecasts and stay updated. Clean drains and gutters around your home to ensure smooth water flow. Stay aware, even if flood chances seem low.",
        during: "No major risk, but stay cautious if heavy rain continues. Avoid unnecessary travel during rainfall. Keep your emergency contacts handy just in case.",
        after: "Inspect your surroundings for waterlogging or leaks. Dry out damp areas to prevent mosquito breeding. Continue monitoring local weather updates.",
    },
    GuidanceTier {
        low: 10.0,
        high: 20.0,
        before: "Monitor rainfall and river level trends closely. Prepare essential supplies like a torch, batteries, and first aid kit. Ensure your family knows basic emergency numbers.",
        during: "Avoid walking in puddles or small flooded areas. Keep all electronics unplugged during lightning or storms. Monitor local alerts or advisories carefully.",
        after: "Clean surroundings to prevent mosquito growth. Dispose of any waterlogged waste promptly. Be alert for early signs of disease or contamination.",
    },
    GuidanceTier {
        low: 20.0,
        high: 30.0,
        before: "Store drinking water and non-perishable food for at least three days. Keep important documents in waterproof bags. Check that your phone and power banks are fully charged.",
        during: "Stay indoors as much as possible and avoid low-lying roads. Do not let children play near drains or open water. Follow municipal advisories on local radio or messaging channels.",
        after: "Check your home for seepage and damp walls. Boil drinking water until supply is declared safe. Report blocked drains to the local authority.",
    },
    GuidanceTier {
        low: 30.0,
        high: 40.0,
        before: "Move valuables and electrical appliances to higher shelves. Identify the nearest safe shelter and the route to reach it. Prepare an emergency kit with medicines, cash, and copies of ID.",
        during: "Avoid crossing flowing water, even if it looks shallow. Switch off the main power supply if water starts entering your home. Keep listening to official flood alerts.",
        after: "Do not touch electrical equipment that got wet until it is checked. Clean and disinfect floors and surfaces touched by floodwater. Watch for fever or stomach illness in the family.",
    },
    GuidanceTier {
        low: 40.0,
        high: 50.0,
        before: "Plan an evacuation route with your family and agree on a meeting point. Keep a bag packed with essentials ready by the door. Secure loose outdoor items that water could carry away.",
        during: "Stay on upper floors if water enters the ground floor. Avoid using lifts and basements. Keep emergency helpline numbers written on paper in case your phone fails.",
        after: "Return home only in daylight and check for structural cracks. Throw away food that came into contact with floodwater. Photograph damage for insurance or relief claims.",
    },
    GuidanceTier {
        low: 50.0,
        high: 60.0,
        before: "Be ready to evacuate at short notice if authorities advise. Move vehicles to higher ground. Help elderly neighbours and people with disabilities prepare.",
        during: "Evacuate immediately if instructed, taking only essentials. Never drive through flooded roads; half a metre of water can move a car. Turn off gas and electricity before leaving home.",
        after: "Wait for authorities to declare the area safe before returning. Wear gloves and boots while cleaning debris. Get tetanus shots if you were injured during cleanup.",
    },
    GuidanceTier {
        low: 60.0,
        high: 70.0,
        before: "Flooding is likely. Shift family members who need assistance to a safe shelter early. Keep livestock and pets in a raised, secure place.",
        during: "Move to the highest safe point of your building if you cannot leave. Avoid contact with floodwater, which may carry sewage or live wires. Use a torch rather than candles.",
        after: "Check on neighbours and report missing persons to rescue teams. Use only bottled or boiled water. Keep children away from damaged buildings and debris.",
    },
    GuidanceTier {
        low: 70.0,
        high: 80.0,
        before: "Severe flooding expected. Evacuate low-lying and riverside areas without waiting for water to rise. Carry medicines, documents, and a charged phone.",
        during: "Follow instructions from rescue teams and do not return for belongings. Signal for help with a cloth or torch if trapped. Stay away from bridges over fast-moving water.",
        after: "Stay in the shelter until authorities give clearance. Expect disruption to water, power, and transport for several days. Seek medical help for any wound exposed to floodwater.",
    },
    GuidanceTier {
        low: 80.0,
        high: 90.0,
        before: "Extreme flood risk. Leave vulnerable areas now and move to designated relief camps. Inform relatives of your location and plans.",
        during: "Do not attempt to walk or swim through floodwater. Keep your group together and account for everyone regularly. Conserve drinking water and phone battery.",
        after: "Cooperate with relief workers on health checks and vaccination drives. Avoid re-entering homes with standing water or electrical hazards. Register with authorities for relief assistance.",
    },
    GuidanceTier {
        low: 90.0,
        high: 100.0,
        before: "Full-scale flooding possible — immediate preparation required. Evacuate low-lying zones early to avoid being trapped. Ensure pets, elderly, and children are moved first.",
        during: "Call emergency helplines if trapped or isolated. Avoid rooftops unless it’s the only option and signal for help. Stay calm and conserve phone battery.",
        after: "Wait for official clearance before re-entry. Thoroughly disinfect all water and food supplies. Assist community members in post-flood recovery.",
    },
];

/// First band containing `risk_pct`, scanning in table order
pub fn lookup(risk_pct: f64) -> Option<&'static GuidanceTier> {
    lookup_in(SAFETY_GUIDE, risk_pct)
}

/// First-match scan over an arbitrary ordered table
pub fn lookup_in(table: &[GuidanceTier], risk_pct: f64) -> Option<&GuidanceTier> {
    table.iter().find(|tier| tier.contains(risk_pct))
}
