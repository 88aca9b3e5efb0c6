use lazy_static::lazy_static;
use std::collections::HashMap;

lazy_static! {
    /// 风格名称到系统提示词的固定映射表
    ///
    /// 键即客户端提交的 style 字段；不在表内的风格会被生成接口拒绝
    pub static ref SYSTEM_PROMPTS: HashMap<&'static str, &'static str> = {
        let mut prompts = HashMap::new();
        prompts.insert(
            "Studio Laika",
            "A stop-motion-inspired image in the style of Studio Laika (Coraline, Kubo).",
        );
        prompts.insert(
            "3dsoft",
            "A soft 3D illustration of the subject, isolated on a smooth, light beige background. The subject should have rounded, minimalistic shapes with subtle shading and soft ambient shadows, giving it a playful, clay-like or plasticine texture. Avoid photorealism—focus on a stylized, toy-like aesthetic. Use a soft isometric or slightly top-down perspective with smooth lighting and no harsh reflections. Render each object with realistic but simplified proportions, a matte finish, and a warm, inviting color palette. The overall tone should feel clean, calm, and tactile—suitable for product design icons, character scenes, or concept visuals.",
        );
        prompts.insert("Ghibli", "A Studio Ghibli-style watercolor image.");
        prompts.insert("80s Anime", "A 1980s anime style image.");
        prompts.insert("T206 Vintage", "A vintage T206 image style.");
        prompts.insert(
            "futuristic",
            "A futuristic trading card with a dark, moody neon aesthetic and soft sci-fi lighting, holographic materials, glowing edges, and subtle motion-blur reflections.",
        );
        prompts.insert(
            "b&w",
            "A high-contrast black and white image with dramatic shadows and a timeless, cinematic style.",
        );
        prompts.insert(
            "photorealistic portrait",
            "A hyper-realistic portrait featuring lifelike skin textures, natural lighting, and sharp focus, resembling a high-resolution photograph captured with a professional camera.",
        );
        prompts.insert(
            "realism",
            "An image rendered in a realistic style, emphasizing accurate lighting, textures, and proportions to closely mimic real-life appearances.",
        );
        prompts.insert(
            "immersive photo-real",
            "A richly detailed, cinematic image that feels like a high-end photograph. Focuses on realism, motion, and depth, ideal for storytelling scenes like racing, biking, or travel photography.",
        );
        prompts.insert(
            "lifestyle realism",
            "A photorealistic image capturing candid everyday life—like families cooking, people laughing, or friends hanging out—lit naturally with warm tones and composed like a magazine editorial.",
        );
        prompts.insert(
            "thermal silhouette",
            "A digital thermal silhouette of a full-body human figure with no facial features or clothing. Uses a soft thermal gradient ({gradient_colors}) over a smooth shape, with a white glowing starburst in the chest ({intensity_center}). Brightness is focused on high heat zones ({high_heat_zones}), and the edges are blurred and gently liquified into a clean white background.",
        );
        prompts.insert(
            "knitted toy",
            "An image styled as a handcrafted knitted toy, featuring yarn textures, stitched details, and a soft, plush appearance.",
        );
        prompts.insert(
            "sticker",
            "A vibrant, flat-design image with bold outlines and minimal shading, resembling a collectible sticker.",
        );
        prompts.insert(
            "low poly",
            "A minimalist 3D image composed of simple geometric shapes and flat shading, emulating a low-polygon aesthetic.",
        );
        prompts.insert(
            "marvel",
            "A dynamic, comic book-style image with bold lines, dramatic poses, and vibrant colors, inspired by Marvel superheroes.",
        );
        prompts.insert(
            "retro anime",
            "An image capturing the essence of 1980s anime, with vintage color palettes, grainy textures, and nostalgic character designs.",
        );
        prompts.insert(
            "pop art",
            "A bold and colorful image featuring high contrast, Ben-Day dots, and stylized elements, reminiscent of pop art icons like Warhol and Lichtenstein.",
        );
        prompts.insert(
            "oil on canvas",
            "A richly textured image with visible brushstrokes and layered colors, emulating a traditional oil painting on canvas.",
        );
        prompts.insert(
            "pixar",
            "A charming 3D animated image with expressive characters, soft lighting, and a whimsical atmosphere, characteristic of Pixar films.",
        );
        prompts.insert(
            "caricature",
            "An exaggerated and humorous image emphasizing distinctive features, styled as a playful caricature illustration.",
        );
        prompts.insert(
            "convex",
            "A clean, modern image inspired by the Convex brand. Utilize a minimalist layout with ample white space, incorporating Convex's primary colors—red (#EE342F), yellow (#F3B01C), and purple (#8D2676)—sparingly to highlight key elements. Employ the Kanit typeface for any textual content, reflecting the brand's emphasis on mathematics and programming. Integrate the Reuleaux triangle motif subtly within the design to echo the brand's logo symbolism. The overall aesthetic should convey fluency, responsiveness, and reliability, aligning with Convex's brand identity.",
        );
        prompts.insert(
            "ai founder",
            "Create a stylized 'AI FOUNDER MODE EDITION' anime-inspired trading card. Render a full-body anime-style character based on the uploaded photo with soft pastel tones, clean lighting, and a confident pose. Character should wear a black hoodie that says 'AI Founder Mode' and hold an iPhone or laptop. Add fun tech-themed elements like an AI logo, a framed prompt spec, sticky notes, color wheels, and a glasses-wearing alpaca. Use a beige frame, soft office background, and clean card composition. Top label: 'startup.ai // Startup Founder'. Top-right small text: 'OPEN SOURCE HUMAN | ML-TRAINED | CHEF-COOKING'. Bottom-right: full name. Subtitle: 'AI FOUNDER MODE EDITION'. Style the typography with the Kanit font and accent the layout with Convex brand colors (#EE342F, #F3B01C, #8D2676) and a Reuleaux triangle motif. Background should include faint text: 'We should use Convex'.",
        );
        prompts.insert(
            "VC Mode Edition",
            "A stylized conference badge-style portrait of a venture capitalist character. Render the subject in clean modern vector art with soft lighting and neutral backgrounds. Add subtle overlays like 'Fundraising Mode', coffee mugs, pitch decks, and MacBooks. Include small labels like 'seed stage only' and 'thesis-driven'. Use a tech-minimalist card layout with whitespace and Convex brand colors.",
        );
        prompts.insert(
            "Infra Bro Mode",
            "Create a trading card portrait of a stereotypical infrastructure engineer with dark-mode aesthetics. Use glowing terminal windows, ASCII art, Kubernetes logos, and ultra-detailed keyboards. Add text overlays like 'Self-hosted, obviously' and 'Latency Matters'. Style the background like a data center or neon-tinted co-working cave. Typography should feel tactical and custom-built.",
        );
        prompts.insert(
            "Founder Hacker Card",
            "A collectible image card of a hoodie-wearing hacker-founder in night-lit lighting. Character sits at a desk covered in snacks, open terminal tabs, and whiteboard sketches. Environment is gritty, but lit with ambient neon or monitor glow. Style the card with handwritten TODOs, bug lists, and a sticker-covered laptop. Blend anime grit with startup optimism. Add a badge: 'BUILD WEEKEND WINNER'.",
        );
        prompts.insert(
            "pixel art",
            "A single pixel art character in the style of a 16-bit RPG sprite, rendered at a larger scale with clear, high-resolution detail. Use soft shading, a warm muted color palette, and a 3/4 top-down perspective. The character should have realistic proportions (not chibi), with clean pixel clusters and light dithering for depth and texture. Generate one of the following: 1. A warrior in classic medieval armor with gold accents, or 2. A mage in a dark robe with glowing rune details, holding a wooden staff with a faint magical orb. No animation. No background—export as a transparent PNG or on a plain background. Maintain a strong silhouette and visual clarity, similar to character artwork from *Chained Echoes* or *Octopath Traveler*, but not limited to sprite sheet dimensions.",
        );
        prompts
    };
}

/// 查找风格对应的系统提示词
pub fn system_prompt(style: &str) -> Option<&'static str> {
    SYSTEM_PROMPTS.get(style).copied()
}

/// 拼接系统提示词与用户提示词，格式与生成接口约定保持一致
pub fn compose_prompt(system_prompt: &str, user_prompt: &str) -> String {
    format!("{system_prompt} The image should include: {user_prompt}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_style_resolves() {
        assert_eq!(
            system_prompt("Ghibli"),
            Some("A Studio Ghibli-style watercolor image.")
        );
    }

    #[test]
    fn unknown_style_is_none() {
        assert_eq!(system_prompt("vaporwave"), None);
        assert_eq!(system_prompt(""), None);
    }

    #[test]
    fn style_table_is_complete() {
        assert_eq!(SYSTEM_PROMPTS.len(), 27);
    }

    #[test]
    fn compose_prompt_format() {
        let composed = compose_prompt("A Studio Ghibli-style watercolor image.", "a red fox");
        assert_eq!(
            composed,
            "A Studio Ghibli-style watercolor image. The image should include: a red fox"
        );
    }
}
