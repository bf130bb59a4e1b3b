/*!

This is the long-form manual for `partisan_margin` and `marginmap`.

## Competitiveness scale

Every county result is placed on a ladder according to the margin between the
two parties, as a percentage of all the votes cast in the county. The lower
bound of each rung is inclusive: a margin of exactly 10% is `Safe`.

| Margin       | Republican lead         | Democratic lead         |
|--------------|-------------------------|-------------------------|
| 40% and more | Annihilation (#67000d)  | Annihilation (#08306b)  |
| 30% - 40%    | Dominant (#a50f15)      | Dominant (#08519c)      |
| 20% - 30%    | Stronghold (#cb181d)    | Stronghold (#3182bd)    |
| 10% - 20%    | Safe (#ef3b2c)          | Safe (#6baed6)          |
| 5.5% - 10%   | Likely (#fb6a4a)        | Likely (#9ecae1)        |
| 1% - 5.5%    | Lean (#fcae91)          | Lean (#c6dbef)          |
| 0.5% - 1%    | Tilt (#fee8c8)          | Tilt (#e1f5fe)          |
| under 0.5%   | Tossup (#f7f7f7)        | Tossup (#f7f7f7)        |

A county with an exact tie is always a `Tossup`. Counties without results are
painted with `#e0e7ef`.

The statewide banner uses the same scale, computed on the two-party totals of
all the counties that report both party counts.

## Input formats

The following formats are supported by `marginmap`:
* `json` nested results by year, county and contest (default)
* `csv` one row per candidate
* `xlsx` one row per candidate, in an Excel worksheet

### `json`

```text
{
  "results": {
    "2020": {
      "Davidson": {
        "U.S. Senate": {"dem_votes": 120000, "rep_votes": 80000,
                        "total_votes": 204000, "dem_name": "Jane Doe"}
      }
    }
  }
}
```

Only `dem_votes` and `rep_votes` are needed. `total_votes`, `margin` and
`margin_pct` are computed from them when missing. The top-level `results`
object may be omitted.

The names of the contests do not need to be consistent across counties:
`U.S. Senate`, `US SENATE` and `ussenate` all refer to the same contest. Only
the letters are compared, regardless of case.

### `csv` and `xlsx`

```text
county,office,candidate,party,votes
Adair,President,Jane Doe,DEM,1200
Adair,President,John Roe,REP,5400
```

The columns are found by name in the first row, in any order and case. Rows for
over votes, under votes and straight-party tickets are ignored. Only the
statewide partisan offices are kept (president, U.S. senate, governor,
lieutenant governor, attorney general, auditor, treasurer, superintendent and
the commissioners); judicial, local and ballot-measure races are dropped. The
margin of these results is computed over the two-party total. All the rows
of a file belong to the year given with `--year` (or `year` in the
configuration).

## Geometry

The county names of the map are read from a GeoJSON file, in the property
`NAME` of each feature (see `--name-property`). A plain JSON array of names is
also accepted. The result counties are matched against these names by
comparing their letters only. Counties that cannot be matched are reported in
the `missing` list of the output.

## Configuration

All the options of the command line can also be given in a JSON file with
`--config`. Paths are relative to the directory of the configuration file.
Options passed on the command line take precedence.

```text
{
  "outputSettings": {"outputPath": "out/tn_2020_senate.json"},
  "selection": {"year": "2020", "contest": "U.S. Senate"},
  "geometry": {"filePath": "TN_counties.geojson", "nameProperty": "NAME"},
  "dataSources": [
    {"provider": "json", "filePath": "tn_results.json"},
    {"provider": "csv", "filePath": "2022_general.csv", "year": "2022"}
  ]
}
```

 */
