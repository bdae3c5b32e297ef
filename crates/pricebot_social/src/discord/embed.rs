//! Conversion of platform-neutral embeds into serenity builders.

use crate::PriceEmbed;
use serenity::all::CreateEmbed;

/// Build the serenity embed for a price reply.
pub fn to_create_embed(embed: &PriceEmbed) -> CreateEmbed {
    let mut builder = CreateEmbed::new()
        .title(embed.title())
        .description(embed.description())
        .url(embed.url())
        .colour(*embed.color());

    for field in embed.fields() {
        builder = builder.field(field.name(), field.value(), *field.inline());
    }

    match embed.image_url() {
        Some(url) => builder.image(url),
        None => builder,
    }
}
