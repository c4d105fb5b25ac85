//! Prompt construction for the generator collaborator.
//!
//! The step format the prompts demand is exactly what `parse.rs` accepts;
//! changing one side means changing the other.

use crate::brick::RejectedBrick;

pub const GENERATION_SYSTEM: &str = r#"You are a professional brick Master Builder assistant.

Your job is to design realistic brick builds following strict physical construction rules.

Important building rules:
- All bricks must be placed on a 10x10 stud grid.
- Each brick must specify exact placement coordinates: (x, y, z).
  - x = left-right position (0 to 9)
  - y = front-back position (0 to 9)
  - z = vertical level (0 = base layer)
- Only connect bricks using available top studs.
- Bricks must be supported by bricks below or the ground.
- Bricks must fully fit within the 10x10 base. No part can hang off the edge.
- No floating or side-attachments (assume standard bricks unless told otherwise).

Output strict instructions in the following format:
- For each build step, write exactly:
  Step N: Place {size} {color} {brick type} at (x,y,z), facing {horizontal|vertical}
- Example:
  Step 1: Place 2x4 red brick at (0,0,0), facing horizontal

- Only use plain text in this format.
- Do not use bullet points, markdown, asterisks, or extra descriptions between steps.

After all steps, output a "Parts Used Summary:"
- List each part used, including quantity, size, color, and type.
- Example:
  Parts Used Summary:
  - 2x 2x4 red brick
  - 1x 1x2 yellow plate

Constraints:
- If a part cannot be placed following these rules, skip it.
- Stack vertically where possible.
- Use simple and stable construction techniques.
- Limit instructions and summary to under 400 words.

Friendly and clear tone, but instructions must stay strictly formatted for parsing."#;

pub const CORRECTION_SYSTEM: &str = r#"You are a professional brick Master Builder assistant correcting a build that failed placement simulation.

Rules for the corrected build:
- Keep the successfully placed bricks if possible.
- Replace or reposition the failed bricks with supported placements.
- Ensure every new placement is supported by at least one occupied stud underneath, or sits on the ground (z = 0).
- Only use these part types: 2x4, 1x2, 4x4, 2x6, 1x4.
- Stay within the 10x10 grid (x: 0-9, y: 0-9).
- Maintain the exact step format:
  Step N: Place {size} {color} {brick type} at (x,y,z), facing {horizontal|vertical}
- After all steps, output a "Parts Used Summary:" section.
- Plain text only, no markdown."#;

/// User prompt for the initial generation request.
pub fn generation_user_prompt(parts_list: &str, theme: Option<&str>) -> String {
    format!(
        "Parts List:\n{}\n\nTheme: {}\n\nPlease suggest 1-3 build ideas based on the above, and provide step-by-step assembly instructions for one build.",
        parts_list.trim(),
        theme.unwrap_or("No specific theme"),
    )
}

/// User prompt for a correction request: the previous instruction text plus
/// every rejected placement with its step index and reason.
pub fn correction_user_prompt(previous_instructions: &str, rejected: &[RejectedBrick]) -> String {
    let mut prompt = format!(
        "You previously generated this brick build:\n\n{}\n\nHowever, the following steps were rejected during placement simulation:\n\n",
        previous_instructions.trim()
    );

    for brick in rejected {
        prompt.push_str(&format!(
            "- Step {}: {}: {}\n",
            brick.sequence_index(),
            brick.placement,
            brick.reason.describe()
        ));
    }

    prompt.push_str(
        "\nPlease regenerate the build so that every step passes the placement rules.",
    );
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brick::{BrickPlacement, BrickSize, Orientation, Position, RejectReason};

    fn rejected(step: u32, reason: RejectReason) -> RejectedBrick {
        RejectedBrick {
            placement: BrickPlacement {
                sequence_index: step,
                size: BrickSize::new(1, 2),
                color: "blue".to_string(),
                brick_type: "brick".to_string(),
                position: Position::new(8, 8, 5),
                orientation: Orientation::AlongX,
            },
            reason,
        }
    }

    #[test]
    fn test_generation_prompt_includes_parts_and_theme() {
        let prompt = generation_user_prompt("10x 2x4 red brick\n", Some("castle"));
        assert!(prompt.contains("10x 2x4 red brick"));
        assert!(prompt.contains("Theme: castle"));

        let no_theme = generation_user_prompt("bricks", None);
        assert!(no_theme.contains("No specific theme"));
    }

    #[test]
    fn test_correction_prompt_lists_rejects_with_reasons() {
        let prompt = correction_user_prompt(
            "Step 1: Place 1x2 blue brick at (8,8,5), facing horizontal",
            &[rejected(1, RejectReason::Unsupported)],
        );
        assert!(prompt.contains("Step 1: 1x2 blue brick at (8,8,5), facing horizontal"));
        assert!(prompt.contains(RejectReason::Unsupported.describe()));
        assert!(prompt.contains("You previously generated"));
    }

    #[test]
    fn test_system_prompts_demand_parseable_format() {
        for system in [GENERATION_SYSTEM, CORRECTION_SYSTEM] {
            assert!(system.contains("Step N: Place"));
            assert!(system.contains("Parts Used Summary"));
        }
    }
}
