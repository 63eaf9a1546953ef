use crate::cmd::{Context, ProfilesArgs};
use crate::exit::{CliResult, SUCCESS};
use crate::output::print_profiles;

pub fn run(args: ProfilesArgs, ctx: &Context) -> CliResult<i32> {
    let store = ctx.profiles()?;
    let profiles = store
        .profiles()
        .map(|profile| &**profile)
        .filter(|profile| args.rorg.is_none_or(|rorg| profile.key.rorg == rorg));
    print_profiles(profiles, ctx.format);
    Ok(SUCCESS)
}
